//! chartsmith CLI
//!
//! Builds Plotly charts from YAML specs, re-rendering only what changed.

mod cli;
mod commands;
mod output;
mod signal;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_failures) => {
            if has_failures {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Build {
            format,
            timings,
            force,
        } => commands::build::run_build(&cli, *format, *timings, *force),
        Commands::Status { format } => commands::status::run_status(&cli, *format).map(|_| false),
        Commands::Init { force } => commands::init::run_init(*force).map(|_| false),
        Commands::Clean => commands::clean::run_clean(&cli).map(|_| false),
    }
}
