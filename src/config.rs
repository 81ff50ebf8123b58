//! Configuration module for gator.

use serde::Deserialize;
use std::path::Path;

use crate::{GatorError, Result};

/// Database pool configuration.
///
/// The connection string itself lives in the session file.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty disables file logging.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// RSS fetcher configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RssConfig {
    /// Total request timeout in seconds.
    #[serde(default = "default_rss_timeout")]
    pub timeout_secs: u64,
    /// Connection timeout in seconds.
    #[serde(default = "default_rss_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_rss_max_redirects")]
    pub max_redirects: usize,
    /// Maximum feed size in bytes.
    #[serde(default = "default_rss_max_feed_size")]
    pub max_feed_size_bytes: u64,
    /// User-Agent header sent with every fetch.
    #[serde(default = "default_rss_user_agent")]
    pub user_agent: String,
}

fn default_rss_timeout() -> u64 {
    30
}

fn default_rss_connect_timeout() -> u64 {
    10
}

fn default_rss_max_redirects() -> usize {
    5
}

fn default_rss_max_feed_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

fn default_rss_user_agent() -> String {
    format!("gator/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for RssConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_rss_timeout(),
            connect_timeout_secs: default_rss_connect_timeout(),
            max_redirects: default_rss_max_redirects(),
            max_feed_size_bytes: default_rss_max_feed_size(),
            user_agent: default_rss_user_agent(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// RSS fetcher configuration.
    #[serde(default)]
    pub rss: RssConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(GatorError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration, falling back to defaults when the file does
    /// not exist. A file that exists but does not parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load(path) {
            Err(GatorError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| GatorError::Config(format!("config parse error: {e}")))
    }
}
