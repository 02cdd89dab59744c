//! Simple Worker Example
//!
//! Polls a queue, "processes" each task by printing it, and reports the
//! outcome on the next poll.
//!
//! # Usage
//!
//! 1. Start the server:
//!    ```bash
//!    cargo run --package taskgate-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --example simple -- default
//!    ```

use taskgate_sdk::{ClaimedTask, TaskReport, TaskgateClient};

fn process(task: &ClaimedTask) -> Result<(), String> {
    match task.data.get("fail").and_then(|v| v.as_str()) {
        Some(reason) => Err(reason.to_string()),
        None => {
            println!("   processed {} -> {}", task.id, task.data);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let queue = std::env::args().nth(1).unwrap_or_else(|| "default".to_string());
    let url =
        std::env::var("TASKGATE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());

    println!("Taskgate SDK - Simple Worker");
    println!("============================\n");

    let client = TaskgateClient::connect(&url).await?;
    let config = client.configuration(&queue).await?;
    println!("Polling '{}' every {:?}\n", queue, config.poll_interval());

    let mut reports = Vec::new();
    loop {
        match client.poll(&queue, &reports).await? {
            Some(task) => {
                let report = match process(&task) {
                    Ok(()) => TaskReport::done(&task.id),
                    Err(reason) => TaskReport::failed(&task.id, reason),
                };
                reports = vec![report];
            }
            None => {
                reports.clear();
                tokio::time::sleep(config.poll_interval()).await;
            }
        }
    }
}
