use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;

mod cli;
mod online_learning;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    // Set up logging level
    match args.verbosity {
        cli::LogLevel::silent => {
            env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();
        }
        cli::LogLevel::normal => {
            env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
        }
        cli::LogLevel::verbose => {
            env_logger::Builder::from_env(Env::default().default_filter_or("debug")).init();
        }
    }

    let summary = online_learning::online_learning(&args)?;
    info!(
        "Finished online learning: {} records, {} skipped, posterior {}",
        summary.records_seen, summary.records_skipped, summary.posterior
    );
    Ok(())
}
