use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::SyncConfig;
use crate::errors::WebDAVError;

use super::router::{RequestDescriptor, RequestRouter, WebDAVMethod};
use super::transport::{HttpTransport, ReqwestTransport, TransportResponse};
use super::{backup_file_path, STORAGE_KEY};

/// Statuses that count as a reachable, WebDAV-speaking server during a probe:
/// created, ok, redirects, folder missing, or MKCOL refused because it exists.
pub const PROBE_SUCCESS_STATUSES: [u16; 8] = [200, 201, 301, 302, 307, 308, 404, 405];

/// Single-blob WebDAV storage client.
///
/// Holds only the configuration snapshot it was built from and a shared
/// transport, so clones are cheap and concurrent calls are independent.
#[derive(Clone)]
pub struct WebDAVClient {
    router: RequestRouter,
    transport: Arc<dyn HttpTransport>,
    file_path: String,
}

impl WebDAVClient {
    /// Creates a client that talks HTTP through reqwest
    pub fn new(config: &SyncConfig) -> Result<Self, WebDAVError> {
        Ok(Self::with_transport(config, Arc::new(ReqwestTransport::new()?)))
    }

    pub fn with_transport(config: &SyncConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            router: RequestRouter::new(config),
            transport,
            file_path: backup_file_path(),
        }
    }

    pub fn router(&self) -> &RequestRouter {
        &self.router
    }

    pub fn folder(&self) -> &str {
        STORAGE_KEY
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Checks that the server is reachable and accepts the credentials.
    ///
    /// Never fails: transport errors and unexpected statuses both yield `false`.
    pub async fn probe(&self) -> bool {
        match self.probe_status().await {
            Ok(response) => {
                let success = PROBE_SUCCESS_STATUSES.contains(&response.status);
                if success {
                    info!("✅ WebDAV check success, {} {}", response.status, response.status_text);
                } else {
                    warn!("❌ WebDAV check failed, {} {}", response.status, response.status_text);
                }
                success
            }
            Err(e) if e.is_connection_error() => {
                error!("❌ WebDAV check failed, server unreachable: {}", e);
                false
            }
            Err(e) => {
                error!("❌ WebDAV check failed: {}", e);
                false
            }
        }
    }

    /// Issues the probe request and returns the raw response
    pub async fn probe_status(&self) -> Result<TransportResponse, WebDAVError> {
        let descriptor = RequestDescriptor::new(STORAGE_KEY, WebDAVMethod::Mkcol)
            .with_http_method(WebDAVMethod::Get);
        self.fetch(descriptor).await
    }

    /// Reads the backup blob; a missing file reads as an empty string.
    ///
    /// `key` only labels the log line, the location is always the backup file.
    pub async fn read(&self, key: &str) -> Result<String, WebDAVError> {
        let descriptor = RequestDescriptor::new(self.file_path.as_str(), WebDAVMethod::Get);
        let response = self.fetch_checked(descriptor, &[404]).await?;

        info!("⬇️ WebDAV get key = {}, {} {}", key, response.status, response.status_text);

        if response.status == 404 {
            debug!("No backup found at {}, treating as empty", self.file_path);
            return Ok(String::new());
        }

        Ok(response.into_text())
    }

    /// Overwrites the backup blob with `value`
    pub async fn write(&self, key: &str, value: &str) -> Result<(), WebDAVError> {
        let descriptor = RequestDescriptor::new(self.file_path.as_str(), WebDAVMethod::Put)
            .with_body(value);
        let response = self.fetch_checked(descriptor, &[]).await?;

        info!("⬆️ WebDAV set key = {}, {} {}", key, response.status, response.status_text);
        Ok(())
    }

    async fn fetch(&self, descriptor: RequestDescriptor) -> Result<TransportResponse, WebDAVError> {
        let request = self.router.route(descriptor);
        self.transport.execute(request).await
    }

    /// Like `fetch`, but non-2xx statuses outside `allowed` become errors
    async fn fetch_checked(
        &self,
        descriptor: RequestDescriptor,
        allowed: &[u16],
    ) -> Result<TransportResponse, WebDAVError> {
        let method = descriptor.webdav_method;
        let request = self.router.route(descriptor);
        let url = request.url.clone();
        let response = self.transport.execute(request).await?;

        if response.is_success() || allowed.contains(&response.status) {
            return Ok(response);
        }

        error!(
            "❌ WebDAV {} {} failed: {} {}",
            method, url, response.status, response.status_text
        );
        Err(WebDAVError::UnexpectedStatus {
            method,
            url,
            status: response.status,
            status_text: response.status_text,
        })
    }
}

impl fmt::Debug for WebDAVClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDAVClient")
            .field("endpoint", &self.router.endpoint())
            .field("proxy_url", &self.router.proxy_url())
            .field("uses_proxy", &self.router.uses_proxy())
            .field("file_path", &self.file_path)
            .finish()
    }
}
