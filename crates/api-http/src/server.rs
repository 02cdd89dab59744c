//! HTTP Server
//!
//! Binds the worker API on TCP and serves it until stopped.

use crate::handler;
use crate::state::HttpState;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use taskgate_core::application::ConfigStore;
use taskgate_core::error::{AppError, Result};
use taskgate_core::port::QueueRegistry;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 8080;

/// HTTP Server Configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Worker API routes, mounted under `/v1`
pub fn router(state: HttpState) -> Router {
    let v1 = Router::new().route(
        "/queue/{queue}",
        get(handler::get_config).post(handler::poll),
    );

    Router::new()
        .nest("/v1", v1)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct HttpServer {
    config: HttpServerConfig,
    state: HttpState,
}

impl HttpServer {
    pub fn new(
        config: HttpServerConfig,
        registry: Arc<dyn QueueRegistry>,
        config_store: Arc<ConfigStore>,
    ) -> Self {
        Self {
            config,
            state: HttpState::new(registry, config_store),
        }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Bind the listener and serve in a background task
    pub async fn start(self) -> Result<HttpServerHandle> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Config(format!("Failed to bind {}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;

        info!(host = %self.config.host, port = local_addr.port(), "Starting HTTP server");

        // Startup diagnostic: where workers should poll
        for name in self.state.registry.queue_names().await? {
            info!(
                queue = %name,
                "Polling URL: http://{}:{}/v1/queue/{}",
                self.config.host,
                local_addr.port(),
                name
            );
        }

        let app = self.router();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!(%local_addr, "HTTP server started successfully");

        Ok(HttpServerHandle {
            local_addr,
            shutdown: shutdown_tx,
            task,
        })
    }
}

/// Running server; dropping it without `stop()` leaves the server running
/// until the runtime shuts down.
pub struct HttpServerHandle {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl HttpServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn stop(self) -> Result<()> {
        let _ = self.shutdown.send(());

        self.task
            .await
            .map_err(|e| AppError::Internal(format!("HTTP server task failed: {}", e)))??;

        info!("HTTP server stopped");
        Ok(())
    }
}
