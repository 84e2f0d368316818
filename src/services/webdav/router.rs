use std::fmt;
use tracing::{debug, warn};
use url::Url;

use crate::config::SyncConfig;

use super::auth::basic_auth_header;
use super::common::strip_trailing_slash;

/// Path prefix under which the proxy exposes its WebDAV relay
pub const PROXY_PATH_PREFIX: &str = "/api/webdav";

/// WebDAV verbs issued by the sync backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebDAVMethod {
    Get,
    Put,
    Mkcol,
}

impl WebDAVMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebDAVMethod::Get => "GET",
            WebDAVMethod::Put => "PUT",
            WebDAVMethod::Mkcol => "MKCOL",
        }
    }
}

impl fmt::Display for WebDAVMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical WebDAV operation, before routing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub path: String,
    pub webdav_method: WebDAVMethod,
    /// Transport verb override, honoured only in proxy mode
    pub http_method: Option<WebDAVMethod>,
    pub body: Option<String>,
}

impl RequestDescriptor {
    pub fn new(path: impl Into<String>, webdav_method: WebDAVMethod) -> Self {
        Self {
            path: path.into(),
            webdav_method,
            http_method: None,
            body: None,
        }
    }

    pub fn with_http_method(mut self, http_method: WebDAVMethod) -> Self {
        self.http_method = Some(http_method);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Path with a leading `/` guaranteed
    pub fn normalized_path(&self) -> String {
        if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        }
    }
}

/// Concrete request handed to the HTTP transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedRequest {
    pub url: String,
    pub method: WebDAVMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Decides where and how each WebDAV request is sent.
///
/// Base URLs are stripped of one trailing slash and proxy mode is resolved
/// once, here, so every routed request sees the same configuration.
#[derive(Debug, Clone)]
pub struct RequestRouter {
    endpoint: String,
    proxy_url: String,
    use_proxy: bool,
    username: String,
    password: String,
}

impl RequestRouter {
    pub fn new(config: &SyncConfig) -> Self {
        let use_proxy = config.proxy.enabled && !config.proxy.proxy_url.is_empty();
        if config.proxy.enabled && !use_proxy {
            warn!("Proxy enabled but no proxy URL configured, connecting directly");
        }

        Self {
            endpoint: strip_trailing_slash(&config.webdav.endpoint).to_string(),
            proxy_url: strip_trailing_slash(&config.proxy.proxy_url).to_string(),
            use_proxy,
            username: config.webdav.username.clone(),
            password: config.webdav.password.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn proxy_url(&self) -> &str {
        &self.proxy_url
    }

    pub fn uses_proxy(&self) -> bool {
        self.use_proxy
    }

    pub fn headers(&self) -> Vec<(String, String)> {
        vec![(
            "authorization".to_string(),
            basic_auth_header(&self.username, &self.password),
        )]
    }

    /// Translates a descriptor into the final URL, verb and headers
    pub fn route(&self, descriptor: RequestDescriptor) -> RoutedRequest {
        let path = descriptor.normalized_path();

        let (url, method) = if self.use_proxy {
            let method = descriptor.http_method.unwrap_or(descriptor.webdav_method);
            (self.proxied_url(&path, descriptor.webdav_method), method)
        } else {
            (self.direct_url(&path), descriptor.webdav_method)
        };

        debug!("🔗 Routed {} {} -> {} {}", descriptor.webdav_method, path, method, url);

        RoutedRequest {
            url,
            method,
            headers: self.headers(),
            body: descriptor.body,
        }
    }

    fn direct_url(&self, path: &str) -> String {
        let raw = format!("{}{}", self.endpoint, path);
        match Url::parse(&raw) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!("Could not parse WebDAV URL '{}' ({}), sending it as-is", raw, e);
                raw
            }
        }
    }

    fn proxied_url(&self, path: &str, webdav_method: WebDAVMethod) -> String {
        let raw = format!("{}{}{}", self.proxy_url, PROXY_PATH_PREFIX, path);
        let proxy_method = webdav_method.as_str();

        match Url::parse(&raw) {
            Ok(mut url) => {
                {
                    let mut query = url.query_pairs_mut();
                    query.append_pair("endpoint", &self.endpoint);
                    if !proxy_method.is_empty() {
                        query.append_pair("proxy_method", proxy_method);
                    }
                }
                url.to_string()
            }
            Err(e) => {
                warn!("Could not parse proxy URL '{}' ({}), building query manually", raw, e);
                let mut url = format!("{}?endpoint={}", raw, urlencoding::encode(&self.endpoint));
                if !proxy_method.is_empty() {
                    url.push_str("&proxy_method=");
                    url.push_str(proxy_method);
                }
                url
            }
        }
    }
}
