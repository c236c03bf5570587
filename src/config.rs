//! Configuration management for Scribe
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, ScribeError};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Scribe
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Generation endpoint settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Local storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Terminal presentation settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Generation endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// URL that receives `POST { session }`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:5000/generate".to_string()
}

fn default_timeout() -> u64 {
    300
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Local storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Optional path of the storage file; the user data directory is used when unset
    #[serde(default)]
    pub path: Option<String>,
}

/// Terminal presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme used until one is saved: "light" or "dark"
    #[serde(default = "default_theme")]
    pub default_theme: String,
}

fn default_theme() -> String {
    "light".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_theme: default_theme(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(ScribeError::Io)?;
        let config = serde_yaml::from_str(&contents).map_err(ScribeError::Yaml)?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(endpoint) = std::env::var("SCRIBE_API_ENDPOINT") {
            self.api.endpoint = endpoint;
        }

        if let Ok(timeout) = std::env::var("SCRIBE_API_TIMEOUT") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_seconds = secs,
                Err(_) => tracing::warn!("Ignoring invalid SCRIBE_API_TIMEOUT: {}", timeout),
            }
        }

        if let Ok(path) = std::env::var(crate::storage::STORAGE_PATH_ENV) {
            self.storage.path = Some(path);
        }

        if let Ok(theme) = std::env::var("SCRIBE_THEME") {
            self.ui.default_theme = theme;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(path) = &cli.storage_path {
            self.storage.path = Some(path.clone());
        }

        if let crate::cli::Commands::Chat {
            endpoint: Some(endpoint),
            ..
        } = &cli.command
        {
            self.api.endpoint = endpoint.clone();
        }
    }

    /// Theme used when none has been saved yet
    ///
    /// Only meaningful after [`Config::validate`] has passed; an invalid value
    /// falls back to [`Theme::Light`].
    pub fn default_theme(&self) -> Theme {
        Theme::parse_str(&self.ui.default_theme).unwrap_or_default()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is not an http(s) URL, the timeout is
    /// outside 1..=3600 seconds, or the default theme is unknown
    pub fn validate(&self) -> Result<()> {
        if self.api.endpoint.trim().is_empty() {
            return Err(ScribeError::Config("api.endpoint cannot be empty".to_string()).into());
        }

        let url = url::Url::parse(&self.api.endpoint).map_err(|e| {
            ScribeError::Config(format!(
                "api.endpoint is not a valid URL ({}): {}",
                self.api.endpoint, e
            ))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ScribeError::Config(format!(
                "api.endpoint must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(ScribeError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.api.timeout_seconds > 3600 {
            return Err(ScribeError::Config(
                "api.timeout_seconds must be less than or equal to 3600".to_string(),
            )
            .into());
        }

        if let Err(e) = Theme::parse_str(&self.ui.default_theme) {
            return Err(ScribeError::Config(format!("ui.default_theme: {}", e)).into());
        }

        Ok(())
    }
}
