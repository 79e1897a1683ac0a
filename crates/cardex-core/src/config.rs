//! `Cardex` Configuration Module
//!
//! Provides configuration file support via `cardex.toml`, environment variables,
//! and runtime overrides.
//!
//! # Priority (highest to lowest)
//!
//! 1. Runtime overrides (builder / test setup)
//! 2. Environment variables (`CARDEX_*`)
//! 3. Configuration file (`cardex.toml`)
//! 4. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::text::MIN_TRIGRAM_LEN;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Upper bound accepted for `search.max_results`.
pub const MAX_RESULTS_LIMIT: usize = 10_000;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Search configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum number of normalized letters a search term must have.
    pub min_term_length: usize,
    /// Maximum candidates returned by engine searches. The default equals
    /// the largest accepted value.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_term_length: MIN_TRIGRAM_LEN,
            max_results: MAX_RESULTS_LIMIT,
        }
    }
}

/// Index configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Index card flavor names as search aliases of the real card name.
    pub index_flavor_names: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_flavor_names: true,
        }
    }
}

/// Logging configuration section.
///
/// The engine drops its own `tracing` events above this level. The host
/// process still installs the subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    pub level: String,
}

impl LoggingConfig {
    /// Parses `level` into a [`LevelFilter`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown level name.
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        match self.level.as_str() {
            "error" => Ok(LevelFilter::ERROR),
            "warn" => Ok(LevelFilter::WARN),
            "info" => Ok(LevelFilter::INFO),
            "debug" => Ok(LevelFilter::DEBUG),
            "trace" => Ok(LevelFilter::TRACE),
            other => Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!("value '{other}' is invalid, expected one of: {LOG_LEVELS:?}"),
            }),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main `Cardex` configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CardexConfig {
    /// Search configuration.
    pub search: SearchConfig,
    /// Index configuration.
    pub index: IndexConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl CardexConfig {
    /// Loads configuration from default sources.
    ///
    /// Priority: defaults < file < environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("cardex.toml")
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("CARDEX_").split("__").lowercase(true));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Terms shorter than one trigram can never match anything.
        if !(MIN_TRIGRAM_LEN..=64).contains(&self.search.min_term_length) {
            return Err(ConfigError::InvalidValue {
                key: "search.min_term_length".to_string(),
                message: format!(
                    "value {} is out of range [{MIN_TRIGRAM_LEN}, 64]",
                    self.search.min_term_length
                ),
            });
        }

        if self.search.max_results == 0 || self.search.max_results > MAX_RESULTS_LIMIT {
            return Err(ConfigError::InvalidValue {
                key: "search.max_results".to_string(),
                message: format!(
                    "value {} is out of range [1, {MAX_RESULTS_LIMIT}]",
                    self.search.max_results
                ),
            });
        }

        self.logging.level_filter()?;

        Ok(())
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Writes the configuration to `path` as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be written.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}
