//! Request/Response Types
//!
//! Wire format of the worker protocol. Task ids travel as `_id`.

use serde::{Deserialize, Serialize};
use taskgate_core::domain::{QueueConfig, Task, TaskId, TaskReport};

/// POST /v1/queue/{queue} body
#[derive(Debug, Default, Deserialize)]
pub struct PollRequest {
    #[serde(default)]
    pub tasks: Vec<ReportedTask>,
}

#[derive(Debug, Deserialize)]
pub struct ReportedTask {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub status: ReportStatus,
    #[serde(default)]
    pub error: Option<String>,
}

/// Statuses a worker may report; anything else fails deserialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Done,
    Failed,
}

impl From<ReportedTask> for TaskReport {
    fn from(reported: ReportedTask) -> Self {
        match reported.status {
            ReportStatus::Done => TaskReport::done(reported.id),
            ReportStatus::Failed => TaskReport::failed(reported.id, reported.error),
        }
    }
}

/// GET /v1/queue/{queue} response
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub configuration: QueueConfig,
}

/// POST /v1/queue/{queue} response when a task was claimed
#[derive(Debug, Clone, Serialize)]
pub struct PollResponse {
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub data: serde_json::Value,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            data: task.data,
        }
    }
}
