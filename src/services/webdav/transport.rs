use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::debug;

use crate::errors::WebDAVError;

use super::common::build_user_agent;
use super::router::{RoutedRequest, WebDAVMethod};

/// Response as seen by the storage operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    body: String,
}

impl TransportResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn into_text(self) -> String {
        self.body
    }
}

/// Sends one routed request and reports what came back.
///
/// Implementations perform exactly one attempt per call: no retry, no
/// redirect-to-error mapping, no status interpretation.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: RoutedRequest) -> Result<TransportResponse, WebDAVError>;
}

/// Default transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, WebDAVError> {
        let client = Client::builder()
            .user_agent(build_user_agent())
            .build()?;
        Ok(Self { client })
    }

    /// Use a caller-configured client (timeouts, TLS roots, proxies)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_http_method(method: WebDAVMethod) -> Method {
    match method {
        WebDAVMethod::Get => Method::GET,
        WebDAVMethod::Put => Method::PUT,
        // MKCOL is a valid token, from_bytes only rejects non-token bytes
        WebDAVMethod::Mkcol => {
            Method::from_bytes(b"MKCOL").expect("MKCOL is a valid HTTP method")
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: RoutedRequest) -> Result<TransportResponse, WebDAVError> {
        let method = to_http_method(request.method);

        debug!("📤 Sending HTTP {} request to: {}", method, request.url);
        let mut builder = self.client.request(method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            debug!("   Body length: {} bytes", body.len());
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("");
        debug!("📥 HTTP Response: {} {}", status.as_u16(), reason);

        let body = response.text().await?;
        Ok(TransportResponse::new(status.as_u16(), reason, body))
    }
}
