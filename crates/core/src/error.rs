// Central Error Type for the Application

use crate::domain::TaskId;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A queue operation failed while applying a worker's task report.
    ///
    /// Entries before `index` have already been applied and stay applied.
    #[error("Failed to apply report #{index} for task {task_id}: {source}")]
    ReportApply {
        index: usize,
        task_id: TaskId,
        #[source]
        source: Box<AppError>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn queue_not_found() -> Self {
        AppError::NotFound(QUEUE_NOT_FOUND.to_string())
    }
}

/// Message returned to workers when a queue name does not resolve
pub const QUEUE_NOT_FOUND: &str = "Queue not found";

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_not_found_message() {
        assert_eq!(AppError::queue_not_found().to_string(), "Queue not found");
    }

    #[test]
    fn test_report_apply_keeps_source() {
        let err = AppError::ReportApply {
            index: 1,
            task_id: "t-1".to_string(),
            source: Box::new(AppError::NotFound("Task t-1 not found".to_string())),
        };

        assert_eq!(
            err.to_string(),
            "Failed to apply report #1 for task t-1: Task t-1 not found"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
