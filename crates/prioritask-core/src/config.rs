//! Client configuration.
//!
//! The base URL is resolved once, when the client is built, and never
//! changes afterwards:
//! 1. Explicit value passed to [`ClientConfig::new`]
//! 2. `PRIORITASK_API_URL` environment variable ([`ClientConfig::from_env`])
//! 3. [`DEFAULT_API_URL`]

use std::time::Duration;

use crate::error::{Error, Result};

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Environment variable overriding the backend URL.
pub const API_URL_ENV: &str = "PRIORITASK_API_URL";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Immutable connection settings for [`crate::client::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Build a config for `base_url`. Trailing slashes are dropped so that
    /// paths like `/tasks` can be appended directly.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let raw = base_url.into();
        let trimmed = raw.trim().trim_end_matches('/');

        let url = reqwest::Url::parse(trimmed)
            .map_err(|e| Error::Config(format!("invalid API URL '{}': {}", raw, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "API URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        })
    }

    /// Resolve the base URL from `PRIORITASK_API_URL`, falling back to the
    /// default local backend.
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::new(DEFAULT_API_URL),
        }
    }

    /// Set the per-request timeout. `None` disables it.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Absolute URL for an API path such as `/tasks`.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_trailing_slash_is_dropped() {
        let config = ClientConfig::new("https://api.example.com/api/v1/").unwrap();
        assert_eq!(config.base_url(), "https://api.example.com/api/v1");
        assert_eq!(config.url_for("/tasks"), "https://api.example.com/api/v1/tasks");
        assert_eq!(config.url_for("tags"), "https://api.example.com/api/v1/tags");
    }

    #[test]
    fn test_rejects_invalid_urls() {
        assert!(matches!(ClientConfig::new("not a url"), Err(Error::Config(_))));
        assert!(matches!(
            ClientConfig::new("ftp://example.com"),
            Err(Error::Config(_))
        ));
    }
}
