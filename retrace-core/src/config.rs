//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/retrace/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/retrace/` (~/.config/retrace/)
//! - Data: `$XDG_DATA_HOME/retrace/` (~/.local/share/retrace/)
//! - State/Logs: `$XDG_STATE_HOME/retrace/` (~/.local/state/retrace/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Event store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which event store backend to use
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Local SQLite store (default)
    #[default]
    Sqlite,
    /// Remote HTTP event store
    Http,
}

/// Event store configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Backend selection
    #[serde(default)]
    pub backend: StoreBackend,

    /// Override path for the SQLite store file
    pub sqlite_path: Option<PathBuf>,

    /// Remote store URL (e.g. `https://events.example.com`)
    pub server_url: Option<String>,

    /// API key for the remote store
    pub api_key: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            sqlite_path: None,
            server_url: None,
            api_key: None,
            timeout_secs: default_store_timeout(),
        }
    }
}

impl StoreConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.backend == StoreBackend::Http {
            if self.server_url.is_none() {
                return Err(Error::Config(
                    "store.server_url is required when backend is \"http\"".to_string(),
                ));
            }
            if self.timeout_secs == 0 {
                return Err(Error::Config(
                    "store.timeout_secs must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn default_store_timeout() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.store.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/retrace/config.toml` (~/.config/retrace/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("retrace").join("config.toml")
    }

    /// Returns the data directory path (for the SQLite store)
    ///
    /// `$XDG_DATA_HOME/retrace/` (~/.local/share/retrace/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("retrace")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/retrace/` (~/.local/state/retrace/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("retrace")
    }

    /// Returns the SQLite store file path, honoring the config override
    ///
    /// `$XDG_DATA_HOME/retrace/events.db` (~/.local/share/retrace/events.db)
    pub fn store_path(&self) -> PathBuf {
        self.store
            .sqlite_path
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("events.db"))
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/retrace/retrace.log` (~/.local/state/retrace/retrace.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("retrace.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.store.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[store]
backend = "http"
server_url = "https://events.example.com"
api_key = "rt_live_xxxxxxxxxxxx"
timeout_secs = 10

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.store.backend, StoreBackend::Http);
        assert_eq!(
            config.store.server_url.as_deref(),
            Some("https://events.example.com")
        );
        assert_eq!(config.store.timeout_secs, 10);
        assert_eq!(config.logging.level, "debug");
        assert!(config.store.validate().is_ok());
    }

    #[test]
    fn test_http_backend_requires_url() {
        let toml = r#"
[store]
backend = "http"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.store.validate().is_err());
    }

    #[test]
    fn test_sqlite_backend_validates_without_url() {
        let config = Config::default();
        assert!(config.store.validate().is_ok());
    }
}
