//! Per-entity growth commands: `monthly`, `month-production` and `history`.

use anyhow::Result;
use chrono::SecondsFormat;
use clap::Args;
use comfy_table::Cell;

use crate::cli::output::{list_table, mb_cell, output, render_list, CommandOutput};
use crate::cli::{open_repository, resolve_namespace};
use crate::domain::models::{Config, EntityKey, MonthComparison, MonthlyGrowth, Namespace, SamplePoint};
use crate::services::aggregator::DEFAULT_HISTORY_DAYS;
use crate::services::GrowthAggregator;

/// Identifies one monitored disk.
#[derive(Args, Debug)]
pub struct EntityArgs {
    /// Site name
    pub site: String,
    /// Sub-site name
    pub sub_site: String,
    /// Server type
    pub server_type: String,

    /// Namespace to read (production, test)
    #[arg(short, long)]
    pub namespace: Option<String>,
}

impl EntityArgs {
    fn key(&self) -> EntityKey {
        EntityKey::new(&self.site, &self.sub_site, &self.server_type)
    }
}

#[derive(Args, Debug)]
pub struct MonthlyArgs {
    #[command(flatten)]
    pub entity: EntityArgs,
}

#[derive(Args, Debug)]
pub struct MonthProductionArgs {
    #[command(flatten)]
    pub entity: EntityArgs,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub entity: EntityArgs,

    /// Number of days to look back
    #[arg(short, long, default_value_t = DEFAULT_HISTORY_DAYS)]
    pub days: i64,
}

#[derive(Debug, serde::Serialize)]
pub struct MonthlyOutput {
    #[serde(flatten)]
    pub key: EntityKey,
    pub namespace: Namespace,
    pub months: Vec<MonthlyGrowth>,
}

impl CommandOutput for MonthlyOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["month", "growth (MB)", "max size (MB)"]);
        for month in &self.months {
            table.add_row(vec![
                Cell::new(month.month),
                mb_cell(month.growth_mb),
                mb_cell(month.max_size_mb),
            ]);
        }
        render_list(&format!("months for {}", self.key), &table, self.months.len())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct MonthProductionOutput {
    #[serde(flatten)]
    pub key: EntityKey,
    pub namespace: Namespace,
    #[serde(flatten)]
    pub comparison: MonthComparison,
}

impl CommandOutput for MonthProductionOutput {
    fn to_human(&self) -> String {
        let c = &self.comparison;
        [
            format!("{} ({})", self.key, self.namespace),
            format!("  {}  {:>12.2} MB  (current)", c.current_month, c.current_month_growth),
            format!("  {}  {:>12.2} MB  (previous)", c.previous_month, c.previous_month_growth),
        ]
        .join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HistoryOutput {
    #[serde(flatten)]
    pub key: EntityKey,
    pub namespace: Namespace,
    pub days: i64,
    pub samples: Vec<SamplePoint>,
}

impl CommandOutput for HistoryOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["recorded at", "size (MB)"]);
        for sample in &self.samples {
            table.add_row(vec![
                Cell::new(sample.recorded_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
                mb_cell(sample.size_mb),
            ]);
        }
        render_list(
            &format!("samples for {} in the last {} day(s)", self.key, self.days),
            &table,
            self.samples.len(),
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn monthly(args: MonthlyArgs, config: Config, json_mode: bool) -> Result<()> {
    let namespace = resolve_namespace(&config, args.entity.namespace.as_deref())?;
    let aggregator = GrowthAggregator::new(open_repository(&config).await?);
    let key = args.entity.key();

    let months = aggregator.monthly_growth(&key, namespace).await?;
    output(&MonthlyOutput { key, namespace, months }, json_mode);
    Ok(())
}

pub async fn month_production(args: MonthProductionArgs, config: Config, json_mode: bool) -> Result<()> {
    let namespace = resolve_namespace(&config, args.entity.namespace.as_deref())?;
    let aggregator = GrowthAggregator::new(open_repository(&config).await?);
    let key = args.entity.key();

    let comparison = aggregator.current_and_previous_month_growth(&key, namespace).await?;
    output(&MonthProductionOutput { key, namespace, comparison }, json_mode);
    Ok(())
}

pub async fn history(args: HistoryArgs, config: Config, json_mode: bool) -> Result<()> {
    let namespace = resolve_namespace(&config, args.entity.namespace.as_deref())?;
    let aggregator = GrowthAggregator::new(open_repository(&config).await?);
    let key = args.entity.key();

    let samples = aggregator.history(&key, namespace, args.days).await?;
    output(
        &HistoryOutput {
            key,
            namespace,
            days: args.days,
            samples,
        },
        json_mode,
    );
    Ok(())
}
