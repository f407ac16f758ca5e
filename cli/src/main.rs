//! ragline - main entry point

use clap::Parser;
use color_eyre::Result;
use ragline_cli::Cli;
use ragline_cli::Command;
use ragline_core::config::RaglineConfig;
use tracing::Level;
use tracing::debug;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = RaglineConfig::load(cli.config.as_deref())?;
    debug!("configuration loaded");

    match &cli.command {
        Command::Search(args) => ragline_cli::run_search(&config, args).await?,
        Command::Query(args) => ragline_cli::run_query(&config, args).await?,
        Command::Completion(args) => ragline_cli::run_completion(args),
    }

    Ok(())
}
