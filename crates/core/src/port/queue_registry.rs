// Queue Registry Port (Interface to the queue engine)

use crate::domain::{NewTask, QueueName, Task, TaskId};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Resolves queue names to handles
#[async_trait]
pub trait QueueRegistry: Send + Sync {
    /// Look up a queue by name
    async fn lookup(&self, name: &str) -> Result<Option<Arc<dyn QueueHandle>>>;

    /// All known queue names (startup diagnostics)
    async fn queue_names(&self) -> Result<Vec<QueueName>>;
}

/// Operations on a single queue
///
/// Implementations own claim atomicity: `next` must never hand the same task
/// to two callers.
#[async_trait]
pub trait QueueHandle: Send + Sync {
    /// Canonical queue name
    fn name(&self) -> &str;

    /// Claim the next eligible task, or `None` when nothing is eligible.
    /// The returned task is reserved for the caller.
    async fn next(&self) -> Result<Option<Task>>;

    /// Record the start of a claimed task
    async fn started(&self, id: &TaskId) -> Result<()>;

    /// Mark a task done. Fails if the id is unknown or the task already finished.
    async fn done(&self, id: &TaskId) -> Result<()>;

    /// Mark a task failed. Fails if `error` is absent, the id is unknown or
    /// the task already finished.
    async fn failed(&self, id: &TaskId, error: Option<&str>) -> Result<()>;

    /// Insert tasks, returning them with assigned ids (setup collaborators only)
    async fn insert(&self, tasks: Vec<NewTask>) -> Result<Vec<Task>>;

    /// Remove every task of this queue (setup collaborators only)
    async fn clear(&self) -> Result<()>;
}
