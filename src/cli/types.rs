//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use super::commands::demo::{ResetArgs, SeedDemoArgs};
use super::commands::growth::{HistoryArgs, MonthProductionArgs, MonthlyArgs};
use super::commands::init::InitArgs;
use super::commands::report::ReportArgs;
use super::commands::serve::ServeArgs;
use super::commands::summary::SummaryArgs;

#[derive(Parser, Debug)]
#[command(name = "loghive")]
#[command(about = "LogHive - disk usage collector and growth dashboard", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write default configuration and create both namespace databases
    Init(InitArgs),

    /// Run the HTTP server for agents and the dashboard
    Serve(ServeArgs),

    /// Record one disk usage report
    Report(ReportArgs),

    /// Latest size and growth for every entity
    Summary(SummaryArgs),

    /// Per-month growth for one entity
    Monthly(MonthlyArgs),

    /// Current vs previous month production for one entity
    MonthProduction(MonthProductionArgs),

    /// Raw samples for one entity over recent days
    History(HistoryArgs),

    /// Replace the test namespace with generated demo history
    SeedDemo(SeedDemoArgs),

    /// Delete every sample in one namespace
    Reset(ResetArgs),
}
