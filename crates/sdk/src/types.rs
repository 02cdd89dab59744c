//! SDK Request/Response Types
//!
//! Mirrors the wire format of the worker API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Outcome of a task the worker claimed earlier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskReport {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Done,
    Failed,
}

impl TaskReport {
    pub fn done(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: ReportStatus::Done,
            error: None,
        }
    }

    pub fn failed(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: ReportStatus::Failed,
            error: Some(message.into()),
        }
    }
}

/// Task handed to this worker by a poll
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClaimedTask {
    #[serde(rename = "_id")]
    pub id: String,
    pub data: Value,
}

/// Polling interval used when the served `interval` is not a millisecond count (30s)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Queue settings served to workers
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueueConfiguration {
    /// Polling interval in milliseconds, passed through as stored on the server
    #[serde(default)]
    pub interval: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueueConfiguration {
    /// `interval` as whole milliseconds, if it is a non-negative integer
    pub fn interval_ms(&self) -> Option<u64> {
        self.interval.as_u64()
    }

    pub fn poll_interval(&self) -> Duration {
        self.interval_ms()
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PollRequest<'a> {
    pub tasks: &'a [TaskReport],
}

#[derive(Debug, Deserialize)]
pub(crate) struct PollResponse {
    pub tasks: Vec<ClaimedTask>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConfigResponse {
    pub configuration: QueueConfiguration,
}
