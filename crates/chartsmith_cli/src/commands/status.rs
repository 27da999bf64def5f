//! Status command implementation

use miette::{IntoDiagnostic, Result};

use chartsmith_charts::default_registry;
use chartsmith_core::{Builder, load_jobs};

use crate::cli::{Cli, OutputFormat};
use crate::commands::{load_config, open_store};
use crate::output::output_plan;

/// Prints which charts a build would render, without rendering anything.
pub fn run_status(cli: &Cli, format: OutputFormat) -> Result<()> {
    let config = load_config(cli)?;
    let jobs = load_jobs(&config).into_diagnostic()?;
    let store = open_store(&config);

    let theme = config.theme_path();
    let mut builder = Builder::new(default_registry(theme.clone()));
    if let Some(theme) = theme {
        builder = builder.with_theme(theme);
    }

    let plan = builder.plan(&jobs, &store);
    output_plan(&plan, format)
}
