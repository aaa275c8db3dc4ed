use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::{Config, PLACEHOLDER_API_TOKEN};

/// Directory holding project configuration and the default databases.
pub const CONFIG_DIR: &str = ".loghive";

/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "LOGHIVE_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Database path for the {0} namespace cannot be empty")]
    EmptyDatabasePath(&'static str),

    #[error("Production and test namespaces must use different database files: {0}")]
    SharedDatabasePath(String),

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Ingestion api_token cannot be empty")]
    EmptyApiToken,

    #[error("Invalid server port: {0}")]
    InvalidPort(u16),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the current directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .loghive/config.yaml (project config, created by init)
    /// 3. .loghive/local.yaml (local overrides, optional)
    /// 4. Environment variables (LOGHIVE_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(".")
    }

    /// As [`Self::load`], resolving the `.loghive/` files under `root`.
    pub fn load_from_dir(root: impl AsRef<Path>) -> Result<Config> {
        let dir = root.as_ref().join(CONFIG_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.production_path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath("production"));
        }
        if config.database.test_path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath("test"));
        }
        if config.database.production_path == config.database.test_path {
            return Err(ConfigError::SharedDatabasePath(config.database.production_path.clone()));
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.database.max_connections));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        if config.ingestion.api_token.trim().is_empty() {
            return Err(ConfigError::EmptyApiToken);
        }

        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort(config.server.port));
        }

        Ok(())
    }

    /// Whether the shipped placeholder token is still in use.
    pub fn uses_placeholder_token(config: &Config) -> bool {
        config.ingestion.api_token == PLACEHOLDER_API_TOKEN
    }
}
