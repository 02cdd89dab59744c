// Task Report Processor

use crate::domain::{TaskOutcome, TaskReport};
use crate::error::{AppError, Result};
use crate::port::QueueHandle;
use tracing::{debug, warn};

/// Apply reported outcomes in request order.
///
/// Stops at the first entry the queue rejects and returns it as
/// `AppError::ReportApply`; earlier entries stay applied. Returns the number of
/// entries applied.
pub async fn apply(queue: &dyn QueueHandle, reports: &[TaskReport]) -> Result<usize> {
    for (index, report) in reports.iter().enumerate() {
        let result = match &report.outcome {
            TaskOutcome::Done => queue.done(&report.id).await,
            TaskOutcome::Failed { error } => queue.failed(&report.id, error.as_deref()).await,
        };

        if let Err(source) = result {
            warn!(
                queue = queue.name(),
                task_id = %report.id,
                index,
                error = %source,
                "Task report rejected"
            );
            return Err(AppError::ReportApply {
                index,
                task_id: report.id.clone(),
                source: Box::new(source),
            });
        }

        debug!(queue = queue.name(), task_id = %report.id, outcome = ?report.outcome, "Task report applied");
    }

    Ok(reports.len())
}
