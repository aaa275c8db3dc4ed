//! Implementation of the `loghive report` command.
//!
//! Records a sample either directly into the local store or, with `--url`,
//! by posting to a running LogHive server the way an agent would.

use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;

use crate::adapters::http::{ErrorResponse, ReportResponse, NAMESPACE_HEADER};
use crate::cli::output::{output, CommandOutput};
use crate::cli::{open_repository, resolve_namespace};
use crate::domain::models::{Config, Namespace, ReportPayload};
use crate::domain::ports::NullMetricsSink;
use crate::services::IngestionGate;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Site name
    pub site: String,
    /// Sub-site name
    pub sub_site: String,
    /// Server type
    pub server_type: String,
    /// Measured size in megabytes
    pub size_mb: String,

    /// Monitored path
    #[arg(long, default_value = "/data")]
    pub path: String,

    /// Namespace to record into (production, test)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Base URL of a LogHive server; records locally when omitted
    #[arg(long)]
    pub url: Option<String>,

    /// API token (defaults to ingestion.api_token)
    #[arg(long, env = "LOGHIVE_REPORT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct ReportOutput {
    pub success: bool,
    pub id: i64,
    pub namespace: Namespace,
    pub recorded_at: String,
    pub remote: bool,
}

impl CommandOutput for ReportOutput {
    fn to_human(&self) -> String {
        let target = if self.remote { "remote server" } else { "local store" };
        format!(
            "Recorded sample #{} in {} namespace ({}) at {}",
            self.id, self.namespace, target, self.recorded_at
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl ReportArgs {
    fn payload(&self, token: String) -> ReportPayload {
        ReportPayload {
            token: Some(token),
            site: Some(self.site.clone()),
            sub_site: Some(self.sub_site.clone()),
            server_type: Some(self.server_type.clone()),
            path: Some(self.path.clone()),
            size_mb: Some(serde_json::Value::String(self.size_mb.clone())),
        }
    }
}

pub async fn execute(args: ReportArgs, config: Config, json_mode: bool) -> Result<()> {
    let namespace = resolve_namespace(&config, args.namespace.as_deref())?;
    let token = args.token.clone().unwrap_or_else(|| config.ingestion.api_token.clone());
    let payload = args.payload(token);

    let out = match &args.url {
        Some(url) => {
            let client = reqwest::Client::new();
            let response = send_remote(&client, url, namespace, &payload).await?;
            ReportOutput {
                success: response.success,
                id: response.id,
                namespace,
                recorded_at: response.recorded_at.to_rfc3339(),
                remote: true,
            }
        }
        None => {
            let repository = open_repository(&config).await?;
            let gate = IngestionGate::new(repository, Arc::new(NullMetricsSink), config.ingestion.api_token.clone());
            let sample = gate.ingest(namespace, &payload).await?;
            ReportOutput {
                success: true,
                id: sample.id,
                namespace,
                recorded_at: sample.recorded_at.to_rfc3339(),
                remote: false,
            }
        }
    };

    output(&out, json_mode);
    Ok(())
}

/// POST a report to `{base_url}/api/report`.
pub async fn send_remote(
    client: &reqwest::Client,
    base_url: &str,
    namespace: Namespace,
    payload: &ReportPayload,
) -> Result<ReportResponse> {
    let url = format!("{}/api/report", base_url.trim_end_matches('/'));
    let response = client
        .post(&url)
        .header(NAMESPACE_HEADER, namespace.as_str())
        .json(payload)
        .send()
        .await
        .with_context(|| format!("Failed to reach {url}"))?;

    let status = response.status();
    if status.is_success() {
        return response
            .json::<ReportResponse>()
            .await
            .context("Failed to decode server response");
    }

    let detail = match response.json::<ErrorResponse>().await {
        Ok(body) => format!("{} ({})", body.error, body.code),
        Err(_) => status.to_string(),
    };
    anyhow::bail!("Server rejected report: {detail}")
}
