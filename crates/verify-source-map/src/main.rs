//! verify-source-map: checks a bundler's source maps against multi-file fixtures.

mod cli;
mod config;
mod orchestrator;
mod output;

use clap::Parser;
use cli::Args;
use config::Config;
use miette::Result;
use output::{Formatter, StderrReporter};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_ENV: &str = "VERIFY_SOURCE_MAP_LOG";

/// Exit status when any check failed.
const EXIT_CHECK_FAILED: i32 = 1;
/// Exit status when the harness or the build tool broke.
const EXIT_FAULT: i32 = 2;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_FAULT);
        }
    };

    let formatter = Formatter::new(config.output);
    let result = orchestrator::run(&config, Arc::new(StderrReporter)).await;

    match result {
        Ok(summary) => {
            println!("{}", formatter.format(&summary));
            if summary.failed() > 0 {
                std::process::exit(EXIT_CHECK_FAILED);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_FAULT);
        }
    }
}
