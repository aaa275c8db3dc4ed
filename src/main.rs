//! LogHive CLI entry point.

use clap::Parser;

use loghive::cli::commands::{demo, growth, init, report, serve, summary};
use loghive::cli::{Cli, Commands};
use loghive::infrastructure::config::ConfigLoader;
use loghive::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    // `init` must work before any configuration exists.
    let config = ConfigLoader::load();
    let log_config = config
        .as_ref()
        .map(|c| LogConfig::from(&c.logging))
        .unwrap_or_default();
    let _logger = match LoggerImpl::init(&log_config) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    };

    let result = match (cli.command, config) {
        (Commands::Init(args), _) => init::execute(args, json).await,
        (_, Err(err)) => Err(err),
        (Commands::Serve(args), Ok(config)) => serve::execute(args, config).await,
        (Commands::Report(args), Ok(config)) => report::execute(args, config, json).await,
        (Commands::Summary(args), Ok(config)) => summary::execute(args, config, json).await,
        (Commands::Monthly(args), Ok(config)) => growth::monthly(args, config, json).await,
        (Commands::MonthProduction(args), Ok(config)) => growth::month_production(args, config, json).await,
        (Commands::History(args), Ok(config)) => growth::history(args, config, json).await,
        (Commands::SeedDemo(args), Ok(config)) => demo::seed_demo(args, config, json).await,
        (Commands::Reset(args), Ok(config)) => demo::reset(args, config, json).await,
    };

    if let Err(err) = result {
        loghive::cli::handle_error(err, json);
    }
}
