//! Configuration file loading.
//!
//! The file is RON; everything except the server section has defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use shlink_engine::{ApiSettings, LoaderSettings};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "shlink.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_api_version")]
    pub api_version: u8,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoaderConfig {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
    #[serde(default = "default_large_threshold")]
    pub large_threshold: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        let defaults = LoaderSettings::default();
        Self {
            items_per_page: defaults.items_per_page,
            large_threshold: defaults.large_threshold,
        }
    }
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LogDestination {
    /// Write to ./shlink.log in current directory.
    File,
    /// Write every level to stderr.
    #[default]
    Terminal,
    /// Write to both file and terminal.
    Both,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub destination: LogDestination,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            destination: LogDestination::default(),
        }
    }
}

fn default_api_version() -> u8 {
    3
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_items_per_page() -> u32 {
    LoaderSettings::default().items_per_page
}

fn default_large_threshold() -> usize {
    LoaderSettings::default().large_threshold
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = ron::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("server.base_url is empty".into()));
        }
        if self.server.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("server.api_key is empty".into()));
        }
        if self.loader.items_per_page == 0 {
            return Err(ConfigError::Invalid(
                "loader.items_per_page must be positive".into(),
            ));
        }
        if shlink_logging::parse_level(&self.log.level).is_none() {
            return Err(ConfigError::Invalid(format!(
                "unknown log level `{}`",
                self.log.level
            )));
        }
        Ok(())
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            api_version: self.server.api_version,
            connect_timeout: Duration::from_secs(self.server.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.server.request_timeout_secs),
            ..ApiSettings::new(&self.server.base_url, &self.server.api_key)
        }
    }

    pub fn loader_settings(&self) -> LoaderSettings {
        LoaderSettings {
            items_per_page: self.loader.items_per_page,
            large_threshold: self.loader.large_threshold,
        }
    }
}
