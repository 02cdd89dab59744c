// SQLite QueueHandle Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use taskgate_core::domain::task::require_error_message;
use taskgate_core::domain::{NewTask, Task, TaskId, TaskStatus};
use taskgate_core::error::{AppError, Result};
use taskgate_core::port::{IdProvider, QueueHandle, TimeProvider};
use tracing::debug;

/// One queue stored in the `tasks` table
///
/// Eligible tasks are `queued` tasks whose parent (if any) is `done`, claimed
/// by priority first, then insertion order.
#[derive(Clone)]
pub struct SqliteQueue {
    name: String,
    pool: SqlitePool,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl std::fmt::Debug for SqliteQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteQueue")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl SqliteQueue {
    pub(crate) fn new(
        name: impl Into<String>,
        pool: SqlitePool,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            name: name.into(),
            pool,
            id_provider,
            time_provider,
        }
    }

    /// Find a task of this queue by ID
    pub async fn find(&self, id: &str) -> Result<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = ? AND queue = ?")
            .bind(id)
            .bind(&self.name)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(TaskRow::into_task).transpose()
    }

    /// Count tasks of this queue in `status`
    pub async fn count_by_status(&self, status: TaskStatus) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE queue = ? AND status = ?")
            .bind(&self.name)
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    /// Explain why a conditional update matched no row
    async fn transition_miss(&self, id: &str, to: TaskStatus) -> AppError {
        let current: std::result::Result<Option<String>, _> =
            sqlx::query_scalar("SELECT status FROM tasks WHERE id = ? AND queue = ?")
                .bind(id)
                .bind(&self.name)
                .fetch_optional(&self.pool)
                .await;

        match current {
            Err(e) => map_sqlx_error(e),
            Ok(None) => AppError::NotFound(format!("Task {} not found in queue {}", id, self.name)),
            Ok(Some(current)) => AppError::InvalidState(format!(
                "Cannot move task {} from {} to {}",
                id, current, to
            )),
        }
    }

    /// Move a non-terminal task to a terminal status
    async fn finish(&self, id: &str, to: TaskStatus, error: Option<&str>) -> Result<()> {
        let now = self.time_provider.now_millis();

        // Conditional update: a finished task is never overwritten
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET status = ?, error = ?, finished_at = ?
            WHERE id = ? AND queue = ?
              AND status NOT IN (?, ?)
            "#,
        )
        .bind(to.as_str())
        .bind(error)
        .bind(now)
        .bind(id)
        .bind(&self.name)
        .bind(TaskStatus::Done.as_str())
        .bind(TaskStatus::Failed.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(self.transition_miss(id, to).await);
        }

        debug!(queue = %self.name, task_id = %id, status = %to, "Task finished");
        Ok(())
    }
}

#[async_trait]
impl QueueHandle for SqliteQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn next(&self) -> Result<Option<Task>> {
        // Single statement: selection and reservation happen atomically
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks
            SET status = ?
            WHERE seq = (
                SELECT t.seq FROM tasks t
                WHERE t.queue = ? AND t.status = ?
                  AND (
                      t.parent_id IS NULL
                      OR EXISTS (SELECT 1 FROM tasks p WHERE p.id = t.parent_id AND p.status = ?)
                  )
                ORDER BY t.priority DESC, t.seq ASC
                LIMIT 1
            )
            RETURNING *
            "#,
        )
        .bind(TaskStatus::InProgress.as_str())
        .bind(&self.name)
        .bind(TaskStatus::Queued.as_str())
        .bind(TaskStatus::Done.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(TaskRow::into_task).transpose()
    }

    async fn started(&self, id: &TaskId) -> Result<()> {
        let now = self.time_provider.now_millis();

        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET started_at = ?
            WHERE id = ? AND queue = ? AND status = ?
            "#,
        )
        .bind(now)
        .bind(id)
        .bind(&self.name)
        .bind(TaskStatus::InProgress.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(self.transition_miss(id, TaskStatus::InProgress).await);
        }
        Ok(())
    }

    async fn done(&self, id: &TaskId) -> Result<()> {
        self.finish(id, TaskStatus::Done, None).await
    }

    async fn failed(&self, id: &TaskId, error: Option<&str>) -> Result<()> {
        let error = require_error_message(id, error)?;
        self.finish(id, TaskStatus::Failed, Some(error)).await
    }

    async fn insert(&self, tasks: Vec<NewTask>) -> Result<Vec<Task>> {
        let now = self.time_provider.now_millis();
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let mut inserted = Vec::with_capacity(tasks.len());

        for new_task in tasks {
            let mut task = Task::new(
                self.id_provider.generate_id(),
                now,
                self.name.as_str(),
                new_task.data,
            );
            task.status = new_task.status;
            task.parent_id = new_task.parent_id;
            task.priority = new_task.priority;
            if task.status.is_terminal() {
                task.finished_at = Some(now);
            }

            sqlx::query(
                r#"
                INSERT INTO tasks (
                    id, queue, data, status, error, parent_id,
                    priority, created_at, started_at, finished_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&task.id)
            .bind(&task.queue)
            .bind(task.data.to_string())
            .bind(task.status.as_str())
            .bind(&task.error)
            .bind(&task.parent_id)
            .bind(task.priority)
            .bind(task.created_at)
            .bind(task.started_at)
            .bind(task.finished_at)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

            inserted.push(task);
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(queue = %self.name, count = inserted.len(), "Tasks inserted");

        Ok(inserted)
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM tasks WHERE queue = ?")
            .bind(&self.name)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: String,
    queue: String,
    data: String,
    status: String,
    error: Option<String>,
    parent_id: Option<String>,
    priority: i32,
    created_at: i64,
    started_at: Option<i64>,
    finished_at: Option<i64>,
}

impl TaskRow {
    fn into_task(self) -> Result<Task> {
        Ok(Task {
            status: self.status.parse()?,
            data: serde_json::from_str(&self.data)?,
            id: self.id,
            queue: self.queue,
            error: self.error,
            parent_id: self.parent_id,
            priority: self.priority,
            created_at: self.created_at,
            started_at: self.started_at,
            finished_at: self.finished_at,
        })
    }
}
