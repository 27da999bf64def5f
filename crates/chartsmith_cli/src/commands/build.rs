//! Build command implementation

use miette::{IntoDiagnostic, Result};
use tracing::{error, warn};

use chartsmith_charts::default_registry;
use chartsmith_core::{Builder, load_jobs};

use crate::cli::{Cli, OutputFormat};
use crate::commands::{load_config, open_store};
use crate::output::output_report;
use crate::signal::interrupt_flag;

/// Runs a build. Returns `true` when the batch did not fully succeed.
pub fn run_build(cli: &Cli, format: OutputFormat, timings: bool, force: bool) -> Result<bool> {
    let mut config = load_config(cli)?;

    if timings {
        config.timings = true;
    }

    let jobs = load_jobs(&config).into_diagnostic()?;
    let mut store = open_store(&config);

    let theme = config.theme_path();
    let mut builder = Builder::new(default_registry(theme.clone()))
        .force(force)
        .with_interrupt(interrupt_flag());
    if let Some(theme) = theme {
        builder = builder.with_theme(theme);
    }

    let report = builder.run(&jobs, &mut store);

    output_report(&report, format, config.timings)?;

    if report.interrupted {
        warn!("Build interrupted by user");
    }
    if let Some(e) = &report.persist_error {
        error!("Cache store was not saved: {}", e);
    }

    Ok(!report.is_success())
}
