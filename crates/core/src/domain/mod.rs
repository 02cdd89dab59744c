// Domain Layer - Pure business logic and entities

pub mod config;
pub mod error;
pub mod queue;
pub mod task;

// Re-exports
pub use config::{QueueConfig, DEFAULT_INTERVAL_MS, INTERVAL_KEY};
pub use error::DomainError;
pub use queue::{validate_queue_name, QueueName};
pub use task::{NewTask, Task, TaskId, TaskOutcome, TaskReport, TaskStatus};
