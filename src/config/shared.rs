//! Config cell shared between the poll loop and the command loop

use std::sync::Arc;

use tokio::sync::RwLock;

use super::config::AppConfig;

/// Returned when a status update is empty after trimming
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status message must not be empty")]
pub struct EmptyStatus;

/// Cheap-to-clone handle to the live configuration.
///
/// Only `custom_status` changes after startup; every other field is
/// read-only once the handle is built.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<AppConfig>>,
}

impl SharedConfig {
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the current configuration, taken once per tick
    pub async fn snapshot(&self) -> AppConfig {
        self.inner.read().await.clone()
    }

    pub async fn custom_status(&self) -> String {
        self.inner.read().await.custom_status.clone()
    }

    /// Replace the custom status, returning the stored (trimmed) value
    pub async fn set_custom_status(&self, status: &str) -> Result<String, EmptyStatus> {
        let status = status.trim();
        if status.is_empty() {
            return Err(EmptyStatus);
        }

        let mut config = self.inner.write().await;
        config.custom_status = status.to_string();
        Ok(config.custom_status.clone())
    }
}
