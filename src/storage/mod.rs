//! Storage backend abstraction for sync data
//!
//! The sync orchestrator only sees a key-value store with a reachability
//! check. WebDAV is the backend implemented here.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::SyncConfig;
use crate::errors::WebDAVError;
use crate::services::webdav::WebDAVClient;

/// Core storage trait that every sync backend implements
#[async_trait]
pub trait SyncStorage: Send + Sync {
    /// Whether the backend is reachable with the configured credentials
    async fn check(&self) -> bool;

    /// Fetch the value stored under `key`; an absent value reads as ""
    async fn get(&self, key: &str) -> Result<String, WebDAVError>;

    /// Store `value` under `key`, replacing any previous content
    async fn set(&self, key: &str, value: &str) -> Result<(), WebDAVError>;

    /// Get a human-readable identifier for this backend type
    fn storage_type(&self) -> &'static str;
}

#[async_trait]
impl SyncStorage for WebDAVClient {
    async fn check(&self) -> bool {
        self.probe().await
    }

    async fn get(&self, key: &str) -> Result<String, WebDAVError> {
        self.read(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), WebDAVError> {
        self.write(key, value).await
    }

    fn storage_type(&self) -> &'static str {
        "webdav"
    }
}

/// Create a sync storage backend from the provided configuration
pub fn create_sync_storage(config: &SyncConfig) -> Result<Arc<dyn SyncStorage>, WebDAVError> {
    Ok(Arc::new(WebDAVClient::new(config)?))
}
