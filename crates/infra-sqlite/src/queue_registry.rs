// SQLite QueueRegistry Implementation

use crate::error::map_sqlx_error;
use crate::queue::SqliteQueue;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use taskgate_core::domain::{validate_queue_name, QueueName};
use taskgate_core::error::Result;
use taskgate_core::port::{IdProvider, QueueHandle, QueueRegistry, TimeProvider};
use tracing::info;

/// Named queues backed by one SQLite database
#[derive(Clone)]
pub struct SqliteQueueRegistry {
    pool: SqlitePool,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteQueueRegistry {
    pub fn new(
        pool: SqlitePool,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            pool,
            id_provider,
            time_provider,
        }
    }

    /// Register a queue (idempotent) and return its handle
    pub async fn declare_queue(&self, name: &str) -> Result<SqliteQueue> {
        validate_queue_name(name)?;

        let result = sqlx::query("INSERT OR IGNORE INTO queues (name, created_at) VALUES (?, ?)")
            .bind(name)
            .bind(self.time_provider.now_millis())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() > 0 {
            info!(queue = %name, "Queue declared");
        }

        Ok(self.handle(name))
    }

    /// Typed lookup of a registered queue
    pub async fn queue(&self, name: &str) -> Result<Option<SqliteQueue>> {
        let exists: Option<String> = sqlx::query_scalar("SELECT name FROM queues WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(exists.map(|name| self.handle(&name)))
    }

    fn handle(&self, name: &str) -> SqliteQueue {
        SqliteQueue::new(
            name,
            self.pool.clone(),
            Arc::clone(&self.id_provider),
            Arc::clone(&self.time_provider),
        )
    }
}

#[async_trait]
impl QueueRegistry for SqliteQueueRegistry {
    async fn lookup(&self, name: &str) -> Result<Option<Arc<dyn QueueHandle>>> {
        Ok(self
            .queue(name)
            .await?
            .map(|queue| Arc::new(queue) as Arc<dyn QueueHandle>))
    }

    async fn queue_names(&self) -> Result<Vec<QueueName>> {
        sqlx::query_scalar("SELECT name FROM queues ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}
