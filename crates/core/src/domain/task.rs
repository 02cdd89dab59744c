// Task Domain Model

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task ID (opaque, assigned by the queue engine)
pub type TaskId = String;

/// Task status as stored by the queue engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "queued")]
    Queued,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "paused")]
    Paused,
    #[serde(rename = "done")]
    Done,
    #[serde(rename = "failed")]
    Failed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Queued => "queued",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Paused => "paused",
            TaskStatus::Done => "done",
            TaskStatus::Failed => "failed",
        }
    }

    /// Done and failed tasks accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "queued" => Ok(TaskStatus::Queued),
            "in progress" => Ok(TaskStatus::InProgress),
            "paused" => Ok(TaskStatus::Paused),
            "done" => Ok(TaskStatus::Done),
            "failed" => Ok(TaskStatus::Failed),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// Outcome a worker reports for a task it previously claimed.
///
/// Only these two outcomes exist on the wire; every other status is owned by
/// the queue engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Done,
    /// `error` stays optional here: a missing message is rejected by the queue
    /// engine, not by request validation.
    Failed { error: Option<String> },
}

/// One entry of a worker's task report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub id: TaskId,
    pub outcome: TaskOutcome,
}

impl TaskReport {
    pub fn done(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            outcome: TaskOutcome::Done,
        }
    }

    pub fn failed(id: impl Into<TaskId>, error: Option<String>) -> Self {
        Self {
            id: id.into(),
            outcome: TaskOutcome::Failed { error },
        }
    }
}

/// Task Entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub queue: String,
    pub data: serde_json::Value,
    pub status: TaskStatus,
    pub error: Option<String>,

    /// Task that must be done before this one becomes eligible
    pub parent_id: Option<TaskId>,
    /// Higher number = claimed first
    pub priority: i32,

    pub created_at: i64, // epoch ms
    pub started_at: Option<i64>,
    pub finished_at: Option<i64>,
}

impl Task {
    /// Create a queued task
    ///
    /// # Arguments
    ///
    /// * `id` - Unique task ID (injected, not generated)
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    /// * `queue` - Queue name
    /// * `data` - Arbitrary payload handed to the worker
    pub fn new(
        id: impl Into<TaskId>,
        created_at: i64,
        queue: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            queue: queue.into(),
            data,
            status: TaskStatus::Queued,
            error: None,
            parent_id: None,
            priority: 0,
            created_at,
            started_at: None,
            finished_at: None,
        }
    }
}

/// Validate the error message carried by a `failed` report
pub fn require_error_message<'a>(task_id: &str, error: Option<&'a str>) -> Result<&'a str> {
    match error {
        Some(message) if !message.trim().is_empty() => Ok(message),
        _ => Err(DomainError::MissingErrorMessage(task_id.to_string())),
    }
}

/// Task to be inserted by a setup collaborator (daemon bootstrap, tests)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub data: serde_json::Value,
    #[serde(default = "default_status")]
    pub status: TaskStatus,
    #[serde(default)]
    pub parent_id: Option<TaskId>,
    #[serde(default)]
    pub priority: i32,
}

fn default_status() -> TaskStatus {
    TaskStatus::Queued
}

impl NewTask {
    pub fn new(data: serde_json::Value) -> Self {
        Self {
            data,
            status: TaskStatus::Queued,
            parent_id: None,
            priority: 0,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<TaskId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}
