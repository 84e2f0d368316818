use thiserror::Error;

use crate::services::webdav::WebDAVMethod;

/// Errors surfaced by the WebDAV sync backend
#[derive(Error, Debug)]
pub enum WebDAVError {
    #[error("WebDAV request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("WebDAV {method} {url} returned {status} {status_text}")]
    UnexpectedStatus {
        method: WebDAVMethod,
        url: String,
        status: u16,
        status_text: String,
    },

    #[error("Invalid sync configuration: {0}")]
    Config(String),
}

impl WebDAVError {
    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            WebDAVError::UnexpectedStatus { status, .. } => Some(*status),
            WebDAVError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the failure happened before any response was received
    pub fn is_connection_error(&self) -> bool {
        match self {
            WebDAVError::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }
}
