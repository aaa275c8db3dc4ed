//! Implementation of the `loghive summary` command.

use anyhow::Result;
use chrono::SecondsFormat;
use clap::Args;
use comfy_table::Cell;

use crate::cli::output::{list_table, mb_cell, output, render_list, CommandOutput};
use crate::cli::{open_repository, resolve_namespace};
use crate::domain::models::{Config, DashboardRow, Namespace};
use crate::services::SummaryCompiler;

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Namespace to summarize (production, test)
    #[arg(short, long)]
    pub namespace: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct SummaryOutput {
    pub namespace: Namespace,
    pub entities: Vec<DashboardRow>,
    pub total: usize,
}

impl CommandOutput for SummaryOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&[
            "site",
            "sub-site",
            "server",
            "size (MB)",
            "this month",
            "monthly avg",
            "last report",
        ]);
        for entity in &self.entities {
            table.add_row(vec![
                Cell::new(&entity.row.key.site),
                Cell::new(&entity.row.key.sub_site),
                Cell::new(&entity.row.key.server_type),
                mb_cell(entity.row.size_mb),
                mb_cell(entity.growth_30d),
                mb_cell(entity.monthly_avg_growth),
                Cell::new(entity.row.recorded_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ]);
        }
        render_list(&format!("entities in {}", self.namespace), &table, self.total)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: SummaryArgs, config: Config, json_mode: bool) -> Result<()> {
    let namespace = resolve_namespace(&config, args.namespace.as_deref())?;
    let repository = open_repository(&config).await?;
    let compiler = SummaryCompiler::new(repository);

    let entities = compiler.dashboard(namespace).await?;
    let out = SummaryOutput {
        namespace,
        total: entities.len(),
        entities,
    };
    output(&out, json_mode);
    Ok(())
}
