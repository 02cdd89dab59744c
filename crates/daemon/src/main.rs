//! Taskgate Server - Main Entry Point
//!
//! Composition root: SQLite queue registry + config store + worker HTTP API.

mod config;
mod logging;
mod telemetry;

use anyhow::{Context, Result};
use config::DaemonConfig;
use std::path::Path;
use std::sync::Arc;
use taskgate_api_http::HttpServer;
use taskgate_core::application::ConfigStore;
use taskgate_core::domain::TaskStatus;
use taskgate_core::port::{SystemTimeProvider, UuidProvider};
use taskgate_infra_sqlite::{create_pool, run_migrations, SqliteQueueRegistry};
use tracing::info;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = DaemonConfig::from_env().context("Invalid configuration")?;

    // 2. Initialize logging
    let _log_guard = logging::init(&config)?;
    telemetry::log_status();

    info!("Taskgate v{} starting...", VERSION);

    // 3. Initialize database
    if !config.is_in_memory() {
        if let Some(parent) = Path::new(&config.db_path).parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create {}", parent.display()))?;
        }
    }

    info!(db_path = %config.db_path, "Initializing database...");
    let pool = create_pool(&config.db_path)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 4. Setup dependencies (DI wiring)
    let registry = Arc::new(SqliteQueueRegistry::new(
        pool,
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
    ));

    for name in &config.queues {
        let queue = registry
            .declare_queue(name)
            .await
            .with_context(|| format!("Cannot declare queue '{}'", name))?;
        let queued = queue.count_by_status(TaskStatus::Queued).await?;
        info!(queue = %name, queued, "Queue ready");
    }

    let config_store = Arc::new(ConfigStore::new(registry.clone()));

    // 5. Apply per-queue settings
    if let Some(path) = &config.queue_config {
        for (name, settings) in config::read_queue_settings(path)? {
            config_store
                .set_config(name.as_str(), settings)
                .await
                .with_context(|| format!("Cannot configure queue '{}'", name))?;
        }
    }

    // 6. Start HTTP server
    let server = HttpServer::new(config.http.clone(), registry, config_store);
    let handle = server.start().await.context("HTTP server start failed")?;

    info!("System ready. Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    shutdown_signal().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown
    handle.stop().await.context("HTTP server stop failed")?;
    telemetry::shutdown();

    info!("Shutdown complete.");
    Ok(())
}

/// Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate()).context("Cannot listen for SIGTERM")?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}
