//! Taskgate CLI - poke a Taskgate server the way a worker would

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tabled::{Table, Tabled};
use taskgate_sdk::{TaskReport, TaskgateClient};

const DEFAULT_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "taskgate")]
#[command(about = "Taskgate worker API CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Server base URL
    #[arg(long, env = "TASKGATE_URL", default_value = DEFAULT_URL)]
    url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a queue's configuration
    Config {
        /// Queue name
        queue: String,
    },

    /// Report outcomes, then claim the next eligible task
    Poll {
        /// Queue name
        queue: String,

        /// Mark a task done (repeatable)
        #[arg(long = "done", value_name = "ID")]
        done: Vec<String>,

        /// Mark a task failed (repeatable)
        #[arg(long = "failed", value_name = "ID=MESSAGE", value_parser = parse_failure)]
        failed: Vec<(String, String)>,
    },
}

#[derive(Tabled)]
struct ConfigRow {
    key: String,
    value: String,
}

fn parse_failure(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((id, message)) if !id.is_empty() && !message.trim().is_empty() => {
            Ok((id.to_string(), message.to_string()))
        }
        _ => Err(format!("expected ID=MESSAGE, got '{}'", raw)),
    }
}

fn build_reports(done: Vec<String>, failed: Vec<(String, String)>) -> Vec<TaskReport> {
    done.into_iter()
        .map(TaskReport::done)
        .chain(
            failed
                .into_iter()
                .map(|(id, message)| TaskReport::failed(id, message)),
        )
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = TaskgateClient::connect(&cli.url)
        .await
        .context("Invalid server URL")?;

    match cli.command {
        Commands::Config { queue } => {
            let config = client
                .configuration(&queue)
                .await
                .with_context(|| format!("Failed to fetch configuration of '{}'", queue))?;

            println!("{}", format!("Configuration of '{}'", queue).cyan().bold());
            println!();

            let mut rows = vec![ConfigRow {
                key: "interval".to_string(),
                value: match config.interval_ms() {
                    Some(ms) => format!("{} ms", ms),
                    None => config.interval.to_string(),
                },
            }];
            rows.extend(config.extra.iter().map(|(key, value)| ConfigRow {
                key: key.clone(),
                value: value.to_string(),
            }));

            println!("{}", Table::new(rows));
        }

        Commands::Poll {
            queue,
            done,
            failed,
        } => {
            let reports = build_reports(done, failed);

            let claimed = client
                .poll(&queue, &reports)
                .await
                .with_context(|| format!("Poll of '{}' failed", queue))?;

            if !reports.is_empty() {
                println!(
                    "{}",
                    format!("✓ {} report(s) applied", reports.len()).green().bold()
                );
            }

            match claimed {
                Some(task) => {
                    println!("{} {}", "Claimed:".bold(), task.id);
                    println!("{}", serde_json::to_string_pretty(&task.data)?);
                }
                None => println!("{}", "No eligible task".yellow()),
            }
        }
    }

    Ok(())
}
