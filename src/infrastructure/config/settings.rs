//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Every section is optional; a missing file means all defaults.
//!
//! # Example
//!
//! ```no_run
//! use peaklabel::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::engine::EngineConfig;
use super::logging::{LoggingConfig, LOG_FORMATS};
use crate::adapter::outbound::sqlite::StoreConfig;
use crate::error::{ConfigError, Result};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MIN_WARMUP_BARS: usize = 2;

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Event store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Indicator engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if it exists, otherwise return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error only for a file that exists but does not load.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Initialize the tracing subscriber from `[logging]`.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Database path from `[store] database`, if set.
    #[must_use]
    pub fn database_path(&self) -> Option<PathBuf> {
        self.store.database.as_ref().map(PathBuf::from)
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level",
                reason: format!("'{}' is not one of {LOG_LEVELS:?}", self.logging.level),
            }
            .into());
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("'{}' is not one of {LOG_FORMATS:?}", self.logging.format),
            }
            .into());
        }
        if let Some(database) = &self.store.database {
            if database.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "store.database",
                }
                .into());
            }
        }
        if self.engine.warmup_bars < MIN_WARMUP_BARS {
            return Err(ConfigError::InvalidValue {
                field: "engine.warmup_bars",
                reason: format!("must be at least {MIN_WARMUP_BARS}"),
            }
            .into());
        }
        Ok(())
    }
}
