// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Task {0} cannot be marked failed without an error message")]
    MissingErrorMessage(String),

    #[error("Invalid queue name: {0}")]
    InvalidQueueName(String),

    #[error("Unknown task status: {0}")]
    UnknownStatus(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
