//! Clean command implementation

use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::cli::Cli;
use crate::commands::load_config;

/// Deletes the cache store so the next build renders every chart.
pub fn run_clean(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let path = config.cache_path();

    match std::fs::remove_file(&path) {
        Ok(()) => info!("Removed {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No cache store at {}", path.display());
        }
        Err(e) => return Err(e).into_diagnostic(),
    }

    Ok(())
}
