//! Configuration loading for sitesearch.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/sitesearch/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::SiteSearchError;
use crate::messages::Messages;

/// Terminal viewport used when rendering outside a browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportSettings {
    /// Visible height of the results area in display units
    #[serde(default = "default_client_height")]
    pub client_height: f64,

    /// Height each painted line occupies
    #[serde(default = "default_row_height")]
    pub row_height: f64,
}

fn default_client_height() -> f64 {
    480.0
}

fn default_row_height() -> f64 {
    16.0
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            client_height: default_client_height(),
            row_height: default_row_height(),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Search engine base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Index holding both documents and sections
    #[serde(default = "default_index")]
    pub index: String,

    /// Prefix used to build absolute result links
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Engine API key, from the config file or SITESEARCH_API_KEY
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Result-count display strings
    #[serde(default)]
    pub messages: Messages,

    /// Terminal viewport
    #[serde(default)]
    pub viewport: ViewportSettings,
}

fn default_endpoint() -> String {
    "http://localhost:9200".to_string()
}

fn default_index() -> String {
    "site".to_string()
}

fn default_base_url() -> String {
    "/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            index: default_index(),
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
            messages: Messages::default(),
            viewport: ViewportSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/sitesearch/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (SITESEARCH_*, nested keys joined with `__`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, SiteSearchError> {
        let config_dir = ProjectDirs::from("", "", "sitesearch")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("endpoint", default_endpoint())
            .map_err(|e| SiteSearchError::Config(e.to_string()))?
            .set_default("index", default_index())
            .map_err(|e| SiteSearchError::Config(e.to_string()))?
            .set_default("base_url", default_base_url())
            .map_err(|e| SiteSearchError::Config(e.to_string()))?
            .set_default("timeout_secs", default_timeout_secs() as i64)
            .map_err(|e| SiteSearchError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| SiteSearchError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: SITESEARCH_ENDPOINT, SITESEARCH_MESSAGES__NONE, etc.
        builder = builder.add_source(
            Environment::with_prefix("SITESEARCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| SiteSearchError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| SiteSearchError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), SiteSearchError> {
        if self.endpoint.trim().is_empty() {
            return Err(SiteSearchError::Config("endpoint must not be empty".to_string()));
        }
        if self.index.trim().is_empty() {
            return Err(SiteSearchError::Config("index must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(SiteSearchError::Config("timeout_secs must be > 0".to_string()));
        }
        if self.viewport.row_height <= 0.0 {
            return Err(SiteSearchError::Config(
                "viewport.row_height must be > 0".to_string(),
            ));
        }
        self.messages.validate().map_err(SiteSearchError::Config)
    }

    /// Endpoint without a trailing slash.
    pub fn endpoint_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}
