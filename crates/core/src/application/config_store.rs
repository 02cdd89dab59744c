//! Per-queue configuration handed to polling workers.
//!
//! The store is owned by whoever serves workers (the HTTP server state) and
//! injected at construction. Writes for different queues never interact;
//! concurrent writes for the same queue are last-writer-wins.

use crate::domain::{QueueConfig, QueueName};
use crate::error::{AppError, Result};
use crate::port::{QueueHandle, QueueRegistry};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

/// A queue given either by name or by a handle already resolved from the registry
#[derive(Clone, Copy)]
pub enum QueueRef<'a> {
    Name(&'a str),
    Handle(&'a dyn QueueHandle),
}

impl<'a> QueueRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            QueueRef::Name(name) => name,
            QueueRef::Handle(handle) => handle.name(),
        }
    }
}

impl<'a> From<&'a str> for QueueRef<'a> {
    fn from(name: &'a str) -> Self {
        QueueRef::Name(name)
    }
}

impl<'a> From<&'a String> for QueueRef<'a> {
    fn from(name: &'a String) -> Self {
        QueueRef::Name(name.as_str())
    }
}

impl<'a> From<&'a dyn QueueHandle> for QueueRef<'a> {
    fn from(handle: &'a dyn QueueHandle) -> Self {
        QueueRef::Handle(handle)
    }
}

impl<'a> From<&'a Arc<dyn QueueHandle>> for QueueRef<'a> {
    fn from(handle: &'a Arc<dyn QueueHandle>) -> Self {
        QueueRef::Handle(handle.as_ref())
    }
}

pub struct ConfigStore {
    registry: Arc<dyn QueueRegistry>,
    entries: RwLock<HashMap<QueueName, QueueConfig>>,
}

impl ConfigStore {
    pub fn new(registry: Arc<dyn QueueRegistry>) -> Self {
        Self {
            registry,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Store `settings` merged with the defaults, replacing any previous entry.
    ///
    /// A name must resolve in the registry (`NotFound` otherwise); a handle is
    /// taken as proof that the queue exists.
    pub async fn set_config<'a>(
        &self,
        queue: impl Into<QueueRef<'a>>,
        settings: Map<String, Value>,
    ) -> Result<QueueConfig> {
        let name = match queue.into() {
            QueueRef::Handle(handle) => handle.name().to_string(),
            QueueRef::Name(name) => self
                .registry
                .lookup(name)
                .await?
                .ok_or_else(AppError::queue_not_found)?
                .name()
                .to_string(),
        };

        let merged = QueueConfig::merged_with_defaults(settings);
        info!(queue = %name, interval_ms = ?merged.interval_ms(), "Queue configuration set");
        self.write().insert(name, merged.clone());

        Ok(merged)
    }

    /// Stored configuration, or the defaults when none was set.
    ///
    /// Never stores anything.
    pub fn get_config<'a>(&self, queue: impl Into<QueueRef<'a>>) -> QueueConfig {
        let queue = queue.into();
        self.read()
            .get(queue.name())
            .cloned()
            .unwrap_or_default()
    }

    /// Number of queues with an explicit configuration
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<QueueName, QueueConfig>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<QueueName, QueueConfig>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
