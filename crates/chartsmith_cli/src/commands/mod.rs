//! Subcommand implementations

pub mod build;
pub mod clean;
pub mod init;
pub mod status;

use miette::{IntoDiagnostic, Result};
use tracing::info;

use chartsmith_cache::CacheStore;
use chartsmith_core::BuildConfig;

use crate::cli::Cli;

/// Loads the config from `--config`, a discovered file, or defaults.
///
/// `--no-cache` overrides the file.
pub fn load_config(cli: &Cli) -> Result<BuildConfig> {
    let mut config = if let Some(ref path) = cli.config {
        BuildConfig::from_file(path).into_diagnostic()?
    } else {
        find_config()?
    };

    if cli.no_cache {
        config.cache = false;
    }

    Ok(config)
}

pub fn find_config() -> Result<BuildConfig> {
    if let Some(path) = BuildConfig::discover(".") {
        info!("Using config: {}", path.display());
        return BuildConfig::from_file(&path).into_diagnostic();
    }

    info!("No config file found, using defaults");
    Ok(BuildConfig::new())
}

/// Opens the cache store, or a disabled one when caching is off.
pub fn open_store(config: &BuildConfig) -> CacheStore {
    let path = config.cache_path();
    if config.cache {
        CacheStore::load(path)
    } else {
        let mut store = CacheStore::new(path);
        store.disable();
        store
    }
}
