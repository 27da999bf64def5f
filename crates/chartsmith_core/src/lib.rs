//! # chartsmith_core
//!
//! Incremental build engine for chartsmith.
//!
//! This crate provides:
//! - Configuration loading
//! - Chart spec discovery and job loading
//! - Job fingerprinting
//! - The `Builder` orchestrator that decides which charts to re-render
//!
//! ## Example
//!
//! ```rust,ignore
//! use chartsmith_cache::CacheStore;
//! use chartsmith_core::{BuildConfig, Builder, load_jobs};
//!
//! let config = BuildConfig::from_file(".chartsmith.jsonc")?;
//! let jobs = load_jobs(&config)?;
//! let mut store = CacheStore::load(config.cache_path());
//!
//! let report = Builder::new(registry).run(&jobs, &mut store);
//! println!("{} built, {} skipped", report.summary().built, report.summary().skipped);
//! ```

mod builder;
mod config;
mod error;
mod executor;
pub mod fingerprint;
mod job;
mod renderer;
mod result;

pub use builder::{Builder, PlannedJob};
pub use config::BuildConfig;
pub use error::{BuildError, BuilderError, JobError, RenderError};
pub use executor::BuildExecutor;
pub use fingerprint::{FingerprintReport, Fingerprinter};
pub use job::{JobSpec, check_unique_outputs, discover_spec_files, load_jobs, load_spec_file};
pub use renderer::{Artifact, Renderer, RendererRegistry};
pub use result::{
    BuildOutcome, BuildReport, BuildResult, BuildSummary, BuildWarning, Decision, StaleReason,
};

#[cfg(test)]
pub mod test_utils;
