// Application Layer - Use Cases and Business Logic

pub mod config_store;
pub mod poll;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use config_store::{ConfigStore, QueueRef};
pub use poll::PollOutcome;
