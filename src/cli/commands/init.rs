//! Implementation of the `loghive init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::adapters::sqlite::{database_url, initialize_database};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Namespace;
use crate::infrastructure::config::{ConfigLoader, CONFIG_DIR};

/// Starting configuration written by `init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# LogHive configuration.
# Any value can be overridden with LOGHIVE_* environment variables,
# e.g. LOGHIVE_INGESTION__API_TOKEN.

server:
  host: 0.0.0.0
  port: 5100
  enable_cors: true

database:
  production_path: .loghive/dashboard.db
  test_path: .loghive/dashboard_test.db
  max_connections: 5

ingestion:
  # Replace before deploying agents.
  api_token: change-me-set-api-token-in-env

dashboard:
  default_namespace: production

logging:
  level: info
  format: pretty
  rotation: daily

sites:
  Site_A:
    sub_sites:
      SubSite_1:
        log_server: { name: Log Server }
        backup_server: { name: Backup Server }
      SubSite_2:
        log_server: { name: Log Server }
        backup_server: { name: Backup Server }
      SubSite_4:
        log_server: { name: Log Server }
        backup_server: { name: Backup Server }
      SubSite_6:
        log_server: { name: Log Server }
        backup_server: { name: Backup Server }
  Site_B:
    sub_sites:
      SubSite_3:
        log_server: { name: Log Server }
        backup_log_server: { name: Backup Log Server }
      SubSite_5:
        log_server: { name: Log Server }
        backup_log_server: { name: Backup Log Server }
      SubSite_6:
        log_server: { name: Log Server }
        backup_log_server: { name: Backup Log Server }
      SubSite_Lab:
        log_server: { name: Log Server }
        backup_log_server: { name: Backup Log Server }
      SubSite_4:
        log_server: { name: Log Server }
        backup_log_server: { name: Backup Log Server }
"#;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub config_written: bool,
    pub databases: Vec<PathBuf>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!("\nWrote {CONFIG_DIR}/config.yaml"));
        }
        if !self.databases.is_empty() {
            lines.push("\nDatabases ready:".to_string());
            for db in &self.databases {
                lines.push(format!("  - {}", db.display()));
            }
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let out = initialize(&args).await?;
    output(&out, json_mode);
    Ok(())
}

/// Write the configuration (unless present) and migrate both databases.
pub async fn initialize(args: &InitArgs) -> Result<InitOutput> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let config_dir = target_path.join(CONFIG_DIR);
    let config_path = config_dir.join("config.yaml");
    let already_initialized = config_path.exists();

    fs::create_dir_all(&config_dir)
        .await
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;

    let config_written = !already_initialized || args.force;
    if config_written {
        fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)
            .await
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
    }

    let config = ConfigLoader::load_from_file(&config_path)?;

    let mut databases = Vec::with_capacity(Namespace::ALL.len());
    for namespace in Namespace::ALL {
        let db_path = resolve_against(&target_path, config.database.path_for(namespace));
        let pool = initialize_database(&database_url(&db_path.to_string_lossy()), None)
            .await
            .with_context(|| format!("Failed to initialize the {namespace} database"))?;
        pool.close().await;
        databases.push(db_path);
    }

    let message = match (already_initialized, args.force) {
        (false, _) => "LogHive initialized successfully.",
        (true, true) => "LogHive reinitialized; configuration reset to defaults.",
        (true, false) => "LogHive already initialized; databases verified. Use --force to reset the configuration.",
    };

    Ok(InitOutput {
        success: true,
        message: message.to_string(),
        initialized_path: target_path,
        config_written,
        databases,
    })
}

fn resolve_against(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
