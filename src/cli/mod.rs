//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::adapters::sqlite::{initialize_repository, SqliteSampleRepository};
use crate::domain::models::{Config, Namespace};
use crate::domain::ports::{DefaultNamespaceResolver, NamespaceResolver};

/// Open and migrate both namespace databases named in `config`.
pub async fn open_repository(config: &Config) -> Result<Arc<SqliteSampleRepository>> {
    let repository = initialize_repository(&config.database)
        .await
        .context("Failed to open LogHive databases. Run 'loghive init' first.")?;
    Ok(Arc::new(repository))
}

/// Resolve a `--namespace` flag against the configured default.
pub fn resolve_namespace(config: &Config, requested: Option<&str>) -> Result<Namespace> {
    DefaultNamespaceResolver::new(config.dashboard.default_namespace)
        .resolve(requested)
        .map_err(anyhow::Error::from)
}

/// Print a command failure and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
