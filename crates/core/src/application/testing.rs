// In-memory queue engine used by the use-case tests

use crate::domain::task::require_error_message;
use crate::domain::{NewTask, QueueName, Task, TaskId, TaskStatus};
use crate::error::{AppError, Result};
use crate::port::{QueueHandle, QueueRegistry};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Queue that keeps tasks in insertion order and records every call
pub struct InMemoryQueue {
    name: QueueName,
    tasks: Mutex<Vec<Task>>,
    calls: Mutex<Vec<String>>,
    counter: AtomicU64,
}

impl InMemoryQueue {
    pub fn new(name: impl Into<QueueName>) -> Self {
        Self {
            name: name.into(),
            tasks: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            counter: AtomicU64::new(1),
        }
    }

    /// Calls in the order they were made, e.g. `["done:task-1", "next"]`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn status(&self, id: &str) -> Option<TaskStatus> {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.status)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    /// Move a non-terminal task to `to`; finished tasks are never overwritten
    fn finish(&self, id: &str, to: TaskStatus, error: Option<String>) -> Result<()> {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))?;
        if task.status.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "Cannot move task {} from {} to {}",
                id, task.status, to
            )));
        }
        task.status = to;
        task.error = error;
        task.finished_at = Some(0);
        Ok(())
    }
}

#[async_trait]
impl QueueHandle for InMemoryQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn next(&self) -> Result<Option<Task>> {
        self.record("next".to_string());
        let mut tasks = self.tasks.lock().unwrap();
        let done: Vec<TaskId> = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .map(|t| t.id.clone())
            .collect();

        let candidate = tasks.iter_mut().find(|t| {
            t.status == TaskStatus::Queued
                && t.parent_id.as_ref().map_or(true, |p| done.contains(p))
        });

        match candidate {
            Some(task) => {
                task.status = TaskStatus::InProgress;
                task.started_at = Some(0);
                Ok(Some(task.clone()))
            }
            None => Ok(None),
        }
    }

    async fn started(&self, id: &TaskId) -> Result<()> {
        self.record(format!("started:{}", id));
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .any(|t| t.id == *id)
            .then_some(())
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))
    }

    async fn done(&self, id: &TaskId) -> Result<()> {
        self.record(format!("done:{}", id));
        self.finish(id, TaskStatus::Done, None)
    }

    async fn failed(&self, id: &TaskId, error: Option<&str>) -> Result<()> {
        self.record(format!("failed:{}", id));
        let error = require_error_message(id, error)?;
        self.finish(id, TaskStatus::Failed, Some(error.to_string()))
    }

    async fn insert(&self, new_tasks: Vec<NewTask>) -> Result<Vec<Task>> {
        let mut tasks = self.tasks.lock().unwrap();
        let inserted: Vec<Task> = new_tasks
            .into_iter()
            .map(|new_task| {
                let n = self.counter.fetch_add(1, Ordering::SeqCst);
                let mut task = Task::new(format!("task-{}", n), n as i64, &self.name, new_task.data);
                task.status = new_task.status;
                task.parent_id = new_task.parent_id;
                task.priority = new_task.priority;
                task
            })
            .collect();
        tasks.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn clear(&self) -> Result<()> {
        self.tasks.lock().unwrap().clear();
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRegistry {
    queues: HashMap<QueueName, Arc<InMemoryQueue>>,
}

impl InMemoryRegistry {
    pub fn with_queue(mut self, queue: Arc<InMemoryQueue>) -> Self {
        self.queues.insert(queue.name().to_string(), queue);
        self
    }
}

#[async_trait]
impl QueueRegistry for InMemoryRegistry {
    async fn lookup(&self, name: &str) -> Result<Option<Arc<dyn QueueHandle>>> {
        Ok(self
            .queues
            .get(name)
            .map(|q| Arc::clone(q) as Arc<dyn QueueHandle>))
    }

    async fn queue_names(&self) -> Result<Vec<QueueName>> {
        let mut names: Vec<QueueName> = self.queues.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_finished_tasks_are_not_overwritten() {
        let queue = InMemoryQueue::new("test");
        let tasks = queue
            .insert(vec![NewTask::new(json!(1)), NewTask::new(json!(2))])
            .await
            .unwrap();

        queue.done(&tasks[0].id).await.unwrap();
        assert!(matches!(
            queue.failed(&tasks[0].id, Some("late")).await,
            Err(AppError::InvalidState(_))
        ));
        assert_eq!(queue.status(&tasks[0].id), Some(TaskStatus::Done));

        assert!(queue.failed(&tasks[1].id, None).await.is_err());
        assert_eq!(queue.status(&tasks[1].id), Some(TaskStatus::Queued));
    }

    #[tokio::test]
    async fn test_next_marks_task_in_progress() {
        let queue = InMemoryQueue::new("test");
        queue.insert(vec![NewTask::new(json!(1))]).await.unwrap();

        let claimed = queue.next().await.unwrap().unwrap();

        assert_eq!(claimed.status, TaskStatus::InProgress);
        assert!(queue.next().await.unwrap().is_none());
    }
}
