use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::args::{BinderOptions, DurationGrammar};
use crate::config::types::Config;
use crate::error::SchemaError;

/// Errors that can occur when loading configuration or command files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },

    #[error("Invalid arguments for command '{command}': {source}")]
    InvalidSchema {
        command: String,
        #[source]
        source: SchemaError,
    },
}

/// Read and parse a TOML file, attaching the path to any error.
pub(crate) fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/macron/config.toml` on Linux, or the platform
    /// equivalent via `dirs::config_dir()`. Falls back to the current
    /// directory if no config dir is available.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("macron").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - Otherwise parses it as TOML and validates.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        Self::load_from(&path)
    }

    /// Loads and validates configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config: Config = read_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The command prefix is non-empty and contains no whitespace
    /// - Every extra duration unit has an alphabetic suffix that is not a
    ///   built-in unit, and a non-zero expression in the built-in grammar
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.commands.prefix;
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::ValidationError {
                message: format!("Command prefix '{}' must be non-empty without whitespace", prefix),
            });
        }

        self.duration_grammar().map(|_| ())
    }

    /// The built-in duration grammar extended with the configured units.
    pub fn duration_grammar(&self) -> Result<DurationGrammar, ConfigError> {
        let base = DurationGrammar::default();
        let mut grammar = base.clone();

        for (suffix, expression) in &self.duration.units {
            if suffix.is_empty() || !suffix.chars().all(char::is_alphabetic) {
                return Err(ConfigError::ValidationError {
                    message: format!("Duration unit '{}' must be alphabetic", suffix),
                });
            }
            if base.unit(suffix).is_some() {
                return Err(ConfigError::ValidationError {
                    message: format!("Duration unit '{}' is built in and cannot be redefined", suffix),
                });
            }

            let size = base
                .parse(expression)
                .map_err(|e| ConfigError::ValidationError {
                    message: format!("Duration unit '{}' = '{}': {}", suffix, expression, e),
                })?;
            if size.is_zero() {
                return Err(ConfigError::ValidationError {
                    message: format!("Duration unit '{}' must not be zero", suffix),
                });
            }

            grammar = grammar.with_unit(suffix, size);
        }

        Ok(grammar)
    }

    /// Parser options derived from the `[parser]` and `[duration]` tables.
    pub fn binder_options(&self) -> Result<BinderOptions, ConfigError> {
        Ok(BinderOptions {
            bool_flags: self.parser.bool_flags,
            reject_unknown_flags: self.parser.reject_unknown_flags,
            durations: self.duration_grammar()?,
        })
    }
}
