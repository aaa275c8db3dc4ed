use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::entity::{EntityKey, Namespace};

/// Placeholder shipped in the default configuration. Accepted, but logged at startup.
pub const PLACEHOLDER_API_TOKEN: &str = "change-me-set-api-token-in-env";

/// Main configuration structure for LogHive
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Per-namespace database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Agent ingestion configuration
    #[serde(default)]
    pub ingestion: IngestionConfig,

    /// Dashboard defaults
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Monitored sites: site -> sub-sites -> server types
    #[serde(default)]
    pub sites: BTreeMap<String, SiteConfig>,
}

impl Config {
    /// Every (site, sub_site, server_type) declared under `sites`, in lexical order.
    pub fn configured_entities(&self) -> Vec<EntityKey> {
        self.sites
            .iter()
            .flat_map(|(site, site_config)| {
                site_config.sub_sites.iter().flat_map(move |(sub_site, servers)| {
                    servers
                        .keys()
                        .map(move |server_type| EntityKey::new(site, sub_site, server_type))
                })
            })
            .collect()
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5100
}

const fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_true(),
        }
    }
}

/// Database configuration. Each namespace gets its own `SQLite` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to the production `SQLite` database file
    #[serde(default = "default_production_path")]
    pub production_path: String,

    /// Path to the test `SQLite` database file
    #[serde(default = "default_test_path")]
    pub test_path: String,

    /// Maximum number of database connections per pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_production_path() -> String {
    ".loghive/dashboard.db".to_string()
}

fn default_test_path() -> String {
    ".loghive/dashboard_test.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl DatabaseConfig {
    pub fn path_for(&self, namespace: Namespace) -> &str {
        match namespace {
            Namespace::Production => &self.production_path,
            Namespace::Test => &self.test_path,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            production_path: default_production_path(),
            test_path: default_test_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Agent ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IngestionConfig {
    /// Shared secret agents must present with every report
    #[serde(default = "default_api_token")]
    pub api_token: String,
}

fn default_api_token() -> String {
    PLACEHOLDER_API_TOKEN.to_string()
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            api_token: default_api_token(),
        }
    }
}

/// Dashboard defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct DashboardConfig {
    /// Namespace used when a request does not name one
    #[serde(default)]
    pub default_namespace: Namespace,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation policy for file output (daily, hourly, never)
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// One physical site.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SiteConfig {
    /// sub-site -> server type -> descriptor
    #[serde(default)]
    pub sub_sites: BTreeMap<String, BTreeMap<String, ServerDescriptor>>,
}

/// Display information for one monitored server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerDescriptor {
    pub name: String,
}
