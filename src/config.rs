//! Configuration management for Vendor Mirror
//!
//! Unified configuration with zero-config defaults and optional TOML
//! overrides. Every pipeline knob that the reference deployment hard-coded
//! (page size, batch width, pass ceiling, delays, chunk size, deadline) is
//! externally configurable here.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::{ClientConfig, EnricherConfig, RefreshConfig};
use crate::errors::{ConfigError, Result};

/// Unified application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Upstream HTTP client settings
    pub client: ClientConfig,
    /// Refresh pipeline settings
    pub refresh: RefreshConfig,
    /// Detail enricher settings
    pub enricher: EnricherConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration, falling back to defaults when no file is given
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an explicitly given file is missing or
    /// malformed
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    }
                    .into());
                }
                let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
                let config: AppConfig =
                    toml::from_str(&contents).map_err(ConfigError::InvalidFormat)?;
                debug!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            None => {
                debug!("Using default configuration");
                Ok(Self::default())
            }
        }
    }
}
