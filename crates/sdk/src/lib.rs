//! Taskgate SDK - Rust Worker Client
//!
//! Talks to the worker-facing HTTP API of a Taskgate server.
//!
//! # Example
//!
//! ```no_run
//! use taskgate_sdk::{TaskReport, TaskgateClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TaskgateClient::connect("http://127.0.0.1:8080").await?;
//!     let config = client.configuration("default").await?;
//!
//!     let mut reports = Vec::new();
//!     loop {
//!         match client.poll("default", &reports).await? {
//!             Some(task) => {
//!                 println!("Working on {}: {}", task.id, task.data);
//!                 reports = vec![TaskReport::done(task.id)];
//!             }
//!             None => {
//!                 reports.clear();
//!                 tokio::time::sleep(config.poll_interval()).await;
//!             }
//!         }
//!     }
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::TaskgateClient;
pub use error::{Result, SdkError};
pub use types::{ClaimedTask, QueueConfiguration, ReportStatus, TaskReport, DEFAULT_POLL_INTERVAL};
