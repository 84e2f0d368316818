use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::errors::WebDAVError;

/// WebDAV server credentials and location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDAVConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
}

/// Optional relay that receives every request and forwards it to the
/// WebDAV endpoint named in its query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    #[serde(rename = "useProxy", default)]
    pub enabled: bool,
    #[serde(rename = "proxyUrl", default)]
    pub proxy_url: String,
}

/// Configuration snapshot a sync client is built from.
///
/// The serialized shape matches the persisted sync store:
/// `{"webdav": {...}, "useProxy": bool, "proxyUrl": "..."}`. Unknown fields
/// are ignored so a full store dump can be loaded directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub webdav: WebDAVConfig,
    #[serde(flatten)]
    pub proxy: ProxyConfig,
}

impl SyncConfig {
    /// Loads configuration from the process environment (and `.env`)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = match lookup("SYNC_USE_PROXY") {
            Some(value) => parse_bool(&value)
                .with_context(|| format!("SYNC_USE_PROXY has invalid value '{}'", value))?,
            None => false,
        };

        Ok(SyncConfig {
            webdav: WebDAVConfig {
                endpoint: lookup("WEBDAV_ENDPOINT").unwrap_or_default(),
                username: lookup("WEBDAV_USERNAME").unwrap_or_default(),
                password: lookup("WEBDAV_PASSWORD").unwrap_or_default(),
            },
            proxy: ProxyConfig {
                enabled,
                proxy_url: lookup("SYNC_PROXY_URL").unwrap_or_default(),
            },
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse sync configuration JSON")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sync configuration from {}", path.display()))?;
        Self::from_json_str(&contents)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), WebDAVError> {
        if self.webdav.endpoint.is_empty() {
            return Err(WebDAVError::Config("WebDAV endpoint cannot be empty".to_string()));
        }

        let endpoint = &self.webdav.endpoint;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(WebDAVError::Config(
                "WebDAV endpoint must start with http:// or https://".to_string(),
            ));
        }

        if self.webdav.username.is_empty() {
            return Err(WebDAVError::Config("Username cannot be empty".to_string()));
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow::anyhow!("expected a boolean, got '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn valid_config() -> SyncConfig {
        SyncConfig {
            webdav: WebDAVConfig {
                endpoint: "https://dav.example.com/remote.php/webdav".to_string(),
                username: "testuser".to_string(),
                password: "testpass".to_string(),
            },
            proxy: ProxyConfig::default(),
        }
    }

    #[test]
    fn test_from_vars_reads_all_fields() {
        let config = SyncConfig::from_vars(lookup_from(&[
            ("WEBDAV_ENDPOINT", "https://dav.example.com/"),
            ("WEBDAV_USERNAME", "alice"),
            ("WEBDAV_PASSWORD", "secret"),
            ("SYNC_USE_PROXY", "TRUE"),
            ("SYNC_PROXY_URL", "https://app.example.com"),
        ]))
        .expect("Config should load successfully");

        // Trailing slashes are left for the client to strip
        assert_eq!(config.webdav.endpoint, "https://dav.example.com/");
        assert_eq!(config.webdav.username, "alice");
        assert_eq!(config.webdav.password, "secret");
        assert!(config.proxy.enabled);
        assert_eq!(config.proxy.proxy_url, "https://app.example.com");
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = SyncConfig::from_vars(lookup_from(&[])).expect("Config should load successfully");
        assert_eq!(config, SyncConfig::default());
        assert!(!config.proxy.enabled);
    }

    #[test]
    fn test_from_vars_rejects_invalid_bool() {
        let result = SyncConfig::from_vars(lookup_from(&[("SYNC_USE_PROXY", "maybe")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_bool_variants() {
        for value in ["1", "true", "Yes", " on "] {
            assert!(parse_bool(value).unwrap(), "{} should parse as true", value);
        }
        for value in ["0", "false", "NO", "off", ""] {
            assert!(!parse_bool(value).unwrap(), "{} should parse as false", value);
        }
    }

    #[test]
    fn test_from_json_str_sync_store_shape() {
        let json = r#"{
            "provider": "webdav",
            "useProxy": true,
            "proxyUrl": "/api/cors/",
            "webdav": {
                "endpoint": "https://dav.example.com/remote.php/webdav/",
                "username": "alice",
                "password": "secret"
            },
            "upstash": { "endpoint": "", "username": "", "apiKey": "" },
            "lastSyncTime": 0
        }"#;

        let config = SyncConfig::from_json_str(json).expect("Sync store JSON should parse");
        assert!(config.proxy.enabled);
        assert_eq!(config.proxy.proxy_url, "/api/cors/");
        assert_eq!(config.webdav.username, "alice");
    }

    #[test]
    fn test_from_json_str_missing_fields_default() {
        let config = SyncConfig::from_json_str("{}").expect("Empty object should parse");
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn test_json_round_trip_uses_store_field_names() {
        let mut config = valid_config();
        config.proxy = ProxyConfig {
            enabled: true,
            proxy_url: "https://app.example.com".to_string(),
        };

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["useProxy"], serde_json::json!(true));
        assert_eq!(value["proxyUrl"], serde_json::json!("https://app.example.com"));
        assert_eq!(value["webdav"]["endpoint"], serde_json::json!("https://dav.example.com/remote.php/webdav"));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"webdav": {{"endpoint": "https://dav.example.com", "username": "bob", "password": "pw"}}}}"#
        )
        .unwrap();

        let config = SyncConfig::from_json_file(file.path()).expect("Config file should load");
        assert_eq!(config.webdav.endpoint, "https://dav.example.com");
        assert_eq!(config.webdav.username, "bob");
        assert!(!config.proxy.enabled);
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = SyncConfig::from_json_file("/nonexistent/davsync.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read sync configuration"));
    }

    #[test]
    fn test_validate() {
        assert!(valid_config().validate().is_ok());

        let mut config = valid_config();
        config.webdav.endpoint = String::new();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.webdav.endpoint = "dav.example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.webdav.username = String::new();
        assert!(config.validate().is_err());

        // Empty passwords are accepted
        let mut config = valid_config();
        config.webdav.password = String::new();
        assert!(config.validate().is_ok());
    }
}
