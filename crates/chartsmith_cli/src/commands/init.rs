//! Init command implementation

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use tracing::info;

use chartsmith_core::BuildConfig;

const DEFAULT_CONFIG: &str = r#"{
  // Chart spec files or glob patterns
  "specs": ["docs/_data/charts.yml"],
  // Reuse charts whose spec and data are unchanged
  "cache": true,
  "cache_dir": ".cache",
  "cache_file": "charts.json",
  // Site file with the chart theme; set to null to disable
  "theme": "docs/_data/site.yml",
  "timings": false
}
"#;

pub fn run_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(BuildConfig::CONFIG_FILES[0]);

    loop {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);

        match options.open(&config_path) {
            Ok(mut file) => {
                use std::io::Write;
                file.write_all(DEFAULT_CONFIG.as_bytes())
                    .into_diagnostic()?;
                info!("Created {}", config_path.display());
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                if !force {
                    return Err(miette::miette!(
                        "Config file already exists. Use --force to overwrite."
                    ));
                }

                match std::fs::remove_file(&config_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_diagnostic(),
                }
            }
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
}
