//! print-loader: wraps text files into printing modules with source maps.

mod cli;
mod config;
mod orchestrator;
mod output;

use clap::Parser;
use cli::{Args, Command};
use miette::Result;
use orchestrator::CliError;
use output::Formatter;
use print_loader::{HEADER_LINES, STATEMENT_COLUMN};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "PRINT_LOADER_LOG";

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Build(build) => {
            let summary = orchestrator::run_build(&build)?;
            let formatter = Formatter::new(build.output);
            print!("{}", formatter.format_build(&summary).map_err(CliError::from)?);
            if summary.error_count > 0 {
                std::process::exit(1);
            }
        }
        Command::Lookup(lookup) => {
            let report = orchestrator::run_lookup(&lookup)?;
            let formatter = Formatter::new(lookup.output);
            print!("{}", formatter.format_lookup(&report).map_err(CliError::from)?);
            if report.original.is_none() {
                std::process::exit(1);
            }
        }
        Command::SelfCheck => {
            print_loader::self_check().map_err(CliError::from)?;
            println!(
                "template ok: statements start at line {} column {}",
                HEADER_LINES + 1,
                STATEMENT_COLUMN
            );
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
