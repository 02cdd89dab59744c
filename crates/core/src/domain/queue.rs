// Queue Domain Model

use crate::domain::error::{DomainError, Result};

/// Queue identifier
pub type QueueName = String;

/// Maximum queue name length (it is also a URL path segment)
pub const MAX_QUEUE_NAME_LEN: usize = 64;

/// Validate a queue name before it is declared
///
/// Names are used verbatim in `/v1/queue/{name}`, so only characters that
/// never need percent-encoding are accepted.
pub fn validate_queue_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DomainError::InvalidQueueName(
            "queue name cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_QUEUE_NAME_LEN {
        return Err(DomainError::InvalidQueueName(format!(
            "queue name too long ({} > {} characters)",
            name.len(),
            MAX_QUEUE_NAME_LEN
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DomainError::InvalidQueueName(format!(
            "'{}' must be alphanumeric (plus '-' and '_')",
            name
        )));
    }

    Ok(())
}
