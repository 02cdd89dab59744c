//! Worker poll use case: apply a task report, then claim the next task.
//!
//! The two phases run strictly in sequence. A completion reported in this
//! request is visible to the claim that follows it, so a task unblocked by
//! that completion can be handed out in the same response.

pub mod claim;
pub mod report;

pub use claim::claim_next;

use crate::domain::{Task, TaskReport};
use crate::error::Result;
use crate::port::QueueHandle;

/// Result of one poll
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome {
    /// Report entries applied
    pub applied: usize,
    /// Task handed to the worker, if any was eligible
    pub claimed: Option<Task>,
}

/// Execute one poll against `queue`.
///
/// A report failure aborts before the claim phase: nothing is claimed.
pub async fn execute(queue: &dyn QueueHandle, reports: &[TaskReport]) -> Result<PollOutcome> {
    let applied = report::apply(queue, reports).await?;
    let claimed = claim::claim_next(queue).await?;

    Ok(PollOutcome { applied, claimed })
}
