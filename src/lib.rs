pub mod config;
pub mod errors;
pub mod services;
pub mod storage;

pub use config::{ProxyConfig, SyncConfig, WebDAVConfig};
pub use errors::WebDAVError;
pub use services::webdav::{WebDAVClient, STORAGE_KEY};
pub use storage::SyncStorage;
