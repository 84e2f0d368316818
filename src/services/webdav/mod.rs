// WebDAV sync backend: routing, auth and the single-blob storage operations

pub mod auth;
pub mod client;
pub mod common;
pub mod router;
pub mod transport;

// Re-export main types for convenience
pub use auth::basic_auth_header;
pub use client::{WebDAVClient, PROBE_SUCCESS_STATUSES};
pub use router::{RequestDescriptor, RequestRouter, RoutedRequest, WebDAVMethod, PROXY_PATH_PREFIX};
pub use transport::{HttpTransport, ReqwestTransport, TransportResponse};

/// Folder on the WebDAV server that holds the sync data
pub const STORAGE_KEY: &str = "chatgpt-next-web";

/// Path of the backup blob, relative to the WebDAV endpoint
pub fn backup_file_path() -> String {
    format!("{}/backup.json", STORAGE_KEY)
}
