//! Implementation of the `loghive serve` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::adapters::http::{AppState, DashboardHttpServer, HttpServerConfig};
use crate::cli::open_repository;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind to (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs, config: Config) -> Result<()> {
    if ConfigLoader::uses_placeholder_token(&config) {
        tracing::warn!("ingestion.api_token is still the shipped placeholder; set LOGHIVE_INGESTION__API_TOKEN");
    }

    let mut http_config = HttpServerConfig::from(&config.server);
    if let Some(host) = args.host {
        http_config.host = host;
    }
    if let Some(port) = args.port {
        http_config.port = port;
    }

    let repository = open_repository(&config).await?;
    let state = AppState::new(repository, &config);
    let server = DashboardHttpServer::new(state, http_config);

    server
        .serve_with_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received");
            }
        })
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("HTTP server failed")
}
