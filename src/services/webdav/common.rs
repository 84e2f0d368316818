//! Common utilities and shared functions for the WebDAV sync backend

/// Build a standardized User-Agent string for all WebDAV requests
pub fn build_user_agent() -> String {
    format!("davsync/{} (WebDAV-Backup)", env!("CARGO_PKG_VERSION"))
}

/// Strip a single trailing slash from a configured base URL
pub fn strip_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_format() {
        let user_agent = build_user_agent();
        assert!(user_agent.starts_with("davsync/"));
        assert_eq!(user_agent, format!("davsync/{} (WebDAV-Backup)", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_strip_trailing_slash_removes_exactly_one() {
        assert_eq!(strip_trailing_slash("https://dav.example.com/"), "https://dav.example.com");
        assert_eq!(strip_trailing_slash("https://dav.example.com//"), "https://dav.example.com/");
        assert_eq!(strip_trailing_slash("https://dav.example.com"), "https://dav.example.com");
        assert_eq!(strip_trailing_slash(""), "");
    }

    #[test]
    fn test_strip_trailing_slash_is_idempotent_on_stripped_values() {
        let once = strip_trailing_slash("https://dav.example.com/remote.php/webdav/");
        assert_eq!(strip_trailing_slash(once), once);
    }
}
