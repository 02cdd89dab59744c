//! Shared wiring for the integration tests
#![allow(dead_code)]

use axum_test::TestServer;
use std::path::PathBuf;
use std::sync::Arc;
use taskgate_api_http::{router, HttpServer, HttpServerConfig, HttpServerHandle, HttpState};
use taskgate_core::application::ConfigStore;
use taskgate_core::port::{SystemTimeProvider, UuidProvider};
use taskgate_infra_sqlite::{create_pool, run_migrations, SqliteQueue, SqliteQueueRegistry};

pub struct TestApp {
    pub registry: Arc<SqliteQueueRegistry>,
    pub config_store: Arc<ConfigStore>,
}

impl TestApp {
    pub async fn in_memory() -> Self {
        Self::with_database(":memory:").await
    }

    /// File-backed database (WAL, pooled connections) under the temp dir
    pub async fn on_disk() -> (Self, PathBuf) {
        let path = std::env::temp_dir().join(format!("taskgate_test_{}.db", uuid::Uuid::new_v4()));
        let app = Self::with_database(path.to_str().unwrap()).await;
        (app, path)
    }

    async fn with_database(url: &str) -> Self {
        let pool = create_pool(url).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let registry = Arc::new(SqliteQueueRegistry::new(
            pool,
            Arc::new(UuidProvider),
            Arc::new(SystemTimeProvider),
        ));
        let config_store = Arc::new(ConfigStore::new(registry.clone()));

        Self {
            registry,
            config_store,
        }
    }

    pub async fn queue(&self, name: &str) -> SqliteQueue {
        self.registry.declare_queue(name).await.unwrap()
    }

    pub fn test_server(&self) -> TestServer {
        let app = router(HttpState::new(
            self.registry.clone(),
            self.config_store.clone(),
        ));
        TestServer::new(app.into_make_service()).expect("Failed to create test server")
    }

    /// Real TCP server on an ephemeral port
    pub async fn start(&self) -> HttpServerHandle {
        let config = HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        HttpServer::new(config, self.registry.clone(), self.config_store.clone())
            .start()
            .await
            .unwrap()
    }
}

pub fn base_url(handle: &HttpServerHandle) -> String {
    format!("http://{}", handle.local_addr())
}

pub fn remove_database(path: &PathBuf) {
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}
