//! Configuration management for ptk.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Environment variables (PRIORITASK_*)
//! 2. Config file (`<data dir>/config.toml`, or `$PRIORITASK_CONFIG`)
//! 3. Default values

use anyhow::{Context, Result};
use directories::ProjectDirs;
use prioritask_core::config::{API_URL_ENV, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use prioritask_core::{ClientConfig, FileSessionStore, HistoryPeriod};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "PRIORITASK_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Prioritask API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Paths
    #[serde(default)]
    pub paths: PathsConfig,

    /// Output settings
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Prioritask API, including `/api/v1`
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Per-request timeout in seconds (0 disables it)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Base directory for ptk data
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Session file (token and selected room). Defaults to
    /// `<data_dir>/session.json`.
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Default look-back for `ptk history` (7, 14, 30, 180 or 360)
    #[serde(default = "default_history_period_days")]
    pub history_period_days: u32,
}

// Default value functions
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_history_period_days() -> u32 {
    HistoryPeriod::default().days()
}

fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("app", "prioritask", "ptk") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".prioritask")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            session_file: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            history_period_days: default_history_period_days(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api.url = url;
            }
        }
        Ok(config)
    }

    /// Load configuration from `path`, using defaults if it does not exist.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            PathBuf::from(path)
        } else {
            default_data_dir().join("config.toml")
        }
    }

    /// Where the session (token, selected room) is persisted.
    pub fn session_path(&self) -> PathBuf {
        self.paths
            .session_file
            .clone()
            .unwrap_or_else(|| self.paths.data_dir.join("session.json"))
    }

    pub fn session_store(&self) -> FileSessionStore {
        FileSessionStore::new(self.session_path())
    }

    /// Connection settings for the API client.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let timeout = match self.api.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let config = ClientConfig::new(&self.api.url)
            .with_context(|| format!("Invalid api.url in {}", Self::config_path().display()))?;
        Ok(config.with_timeout(timeout))
    }

    /// Default history window, falling back to a week for unknown values.
    pub fn history_period(&self) -> HistoryPeriod {
        HistoryPeriod::from_days(self.display.history_period_days).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api.url, "http://localhost:8000/api/v1");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.display.history_period_days, 7);
        assert_eq!(config.history_period(), HistoryPeriod::Week);
        assert!(config.session_path().ends_with("session.json"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nurl = \"https://tareas.example.com/api/v1\"\n\n[display]\nhistory_period_days = 180\n",
        )
        .unwrap();

        let config = Config::load_from(&path).expect("Failed to load config");

        assert_eq!(config.api.url, "https://tareas.example.com/api/v1");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.history_period(), HistoryPeriod::SixMonths);
        assert_eq!(config.paths.session_file, None);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&temp.path().join("nope.toml")).unwrap();
        assert_eq!(config.api.url, DEFAULT_API_URL);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[api\nurl = ").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_session_path() {
        let temp = tempdir().expect("Failed to create temp dir");
        let mut config = Config {
            paths: PathsConfig {
                data_dir: temp.path().to_path_buf(),
                session_file: None,
            },
            ..Config::default()
        };
        assert_eq!(config.session_path(), temp.path().join("session.json"));

        config.paths.session_file = Some(temp.path().join("other.json"));
        assert_eq!(config.session_path(), temp.path().join("other.json"));
    }

    #[test]
    fn test_client_config() {
        let mut config = Config::default();
        config.api.url = "http://127.0.0.1:9000/api/v1/".into();
        config.api.timeout_secs = 0;

        let client = config.client_config().unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9000/api/v1");
        assert_eq!(client.timeout(), None);

        config.api.url = "ftp://example.com".into();
        assert!(config.client_config().is_err());
    }

    #[test]
    fn test_unknown_history_period_falls_back() {
        let mut config = Config::default();
        config.display.history_period_days = 3;
        assert_eq!(config.history_period(), HistoryPeriod::Week);
    }
}
