// Task Claim Responder

use crate::domain::Task;
use crate::error::Result;
use crate::port::QueueHandle;
use tracing::{debug, info};

/// Claim the next eligible task and mark it started.
///
/// Atomicity of the claim belongs to the queue; no extra locking here.
pub async fn claim_next(queue: &dyn QueueHandle) -> Result<Option<Task>> {
    let Some(task) = queue.next().await? else {
        debug!(queue = queue.name(), "No eligible task");
        return Ok(None);
    };

    queue.started(&task.id).await?;
    info!(queue = queue.name(), task_id = %task.id, "Task claimed");

    Ok(Some(task))
}
