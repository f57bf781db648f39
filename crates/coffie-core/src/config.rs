//! Configuration loading and typed config structures for Coffie.
//!
//! The optional configuration file is `coffie.yaml`. This module defines
//! strongly-typed structs that mirror the YAML structure and provides a
//! loader that reads, overrides, and validates it. Every field has a
//! default, so an empty or missing file yields a working setup.

use std::path::Path;

use serde::Deserialize;

use crate::selection::DEFAULT_TRIALS;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is not usable.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Coffie configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CoffieConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// `SQLite` database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Lottery parameters.
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CoffieConfig {
    /// Load configuration from a YAML file, apply environment overrides,
    /// and validate the result.
    ///
    /// Environment variables override file values:
    /// - `COFFIE_HOST` overrides `server.host`
    /// - `COFFIE_PORT` overrides `server.port`
    /// - `COFFIE_PUBLIC_URL` overrides `server.public_url`
    /// - `COFFIE_DATABASE_PATH` overrides `database.path`
    /// - `COFFIE_TRIALS` overrides `selection.trials`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::finish(Self::parse(&contents)?, |key| std::env::var(key).ok())
    }

    /// Load from `path` when it exists, otherwise start from defaults.
    ///
    /// Environment overrides and validation apply in both cases.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        Self::load_or_default_with(path, |key| std::env::var(key).ok())
    }

    fn load_or_default_with<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = if path.exists() {
            Self::parse(&std::fs::read_to_string(path)?)?
        } else {
            Self::default()
        };
        Self::finish(base, lookup)
    }

    fn finish<F>(mut config: Self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No overrides are applied.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Split out from [`CoffieConfig::apply_env_overrides`] so callers can
    /// supply a fixed map instead of the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("COFFIE_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("COFFIE_PORT") {
            self.server.port = val
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("COFFIE_PORT={val}: {e}")))?;
        }
        if let Some(val) = lookup("COFFIE_PUBLIC_URL") {
            self.server.public_url = Some(val);
        }
        if let Some(val) = lookup("COFFIE_DATABASE_PATH") {
            self.database.path = val;
        }
        if let Some(val) = lookup("COFFIE_TRIALS") {
            self.selection.trials = val
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("COFFIE_TRIALS={val}: {e}")))?;
        }
        Ok(())
    }

    /// Reject values that parse but cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selection.trials == 0 {
            return Err(ConfigError::Invalid(
                "selection.trials must be at least 1".to_owned(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".to_owned(),
            ));
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::Invalid("database.path is empty".to_owned()));
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally visible base URL used for redirects (e.g. behind a
    /// TLS-terminating proxy). Relative redirects are used when unset.
    #[serde(default)]
    pub public_url: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
        }
    }
}

/// `SQLite` database settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the database file, created on first connect.
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Lottery parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectionConfig {
    /// Number of trials drawn per selection.
    #[serde(default = "default_trials")]
    pub trials: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    5000
}

fn default_database_path() -> String {
    "db.sqlite".to_owned()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_trials() -> u32 {
    DEFAULT_TRIALS
}

fn default_log_level() -> String {
    "info".to_owned()
}
