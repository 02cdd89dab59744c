//! Shared handler state

use crate::error::HttpError;
use std::sync::Arc;
use taskgate_core::application::ConfigStore;
use taskgate_core::error::AppError;
use taskgate_core::port::{QueueHandle, QueueRegistry};

#[derive(Clone)]
pub struct HttpState {
    pub registry: Arc<dyn QueueRegistry>,
    pub config_store: Arc<ConfigStore>,
}

impl HttpState {
    pub fn new(registry: Arc<dyn QueueRegistry>, config_store: Arc<ConfigStore>) -> Self {
        Self {
            registry,
            config_store,
        }
    }

    /// Resolve a queue name, 404 when the registry does not know it
    pub async fn resolve(&self, name: &str) -> Result<Arc<dyn QueueHandle>, HttpError> {
        self.registry
            .lookup(name)
            .await?
            .ok_or_else(|| HttpError(AppError::queue_not_found()))
    }
}
