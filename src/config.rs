//! Configuration module
//!
//! Settings are read from a TOML file (by default
//! `~/.config/optica-console/config.toml`). Every section is optional and falls
//! back to the values used by the shop's development setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::shared::types::PageSize;
use crate::support::ListingError;

/// Header carrying the tenant (shop) identifier on every API request.
pub const TENANT_HEADER: &str = "X-Optica-Id";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid listing configuration: {0}")]
    Listing(#[from] ListingError),
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ApiConfig {
    /// Base address of the back-office API, e.g. `http://localhost:8000`
    #[validate(url)]
    pub base_url: String,
    /// Shop identifier sent in the `X-Optica-Id` header
    #[validate(length(min = 1, max = 36))]
    pub tenant_id: String,
    /// Whole-request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            tenant_id: "optica-principal".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Listing controller defaults
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ListingConfig {
    /// Delay before a typed query is sent to the server
    #[validate(range(max = 5000))]
    pub debounce_ms: u64,
    /// Initial page size; must be one of 5, 10, 20, 50
    pub page_size: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 400,
            page_size: PageSize::DEFAULT.get(),
        }
    }
}

impl ListingConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn page_size(&self) -> Result<PageSize, ListingError> {
        PageSize::new(self.page_size)
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error (or a full `EnvFilter` directive)
    #[validate(length(min = 1))]
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub api: ApiConfig,
    #[validate(nested)]
    pub listing: ListingConfig,
    #[validate(nested)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load and validate the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.check()?;
        Ok(config)
    }

    /// Run field validation plus the checks `validator` cannot express.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        self.listing.page_size()?;
        Ok(())
    }
}

/// `~/.config/optica-console/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("optica-console"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}
