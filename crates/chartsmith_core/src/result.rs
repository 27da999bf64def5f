//! Build result types.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chartsmith_cache::CacheError;

use crate::BuildError;

/// Why a job has to be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The store has no fingerprint for the output.
    NotCached,
    /// The stored fingerprint differs from the current one.
    FingerprintChanged,
    /// The fingerprint matches but the artifact is gone.
    ArtifactMissing,
    /// Rebuild requested regardless of the store.
    Forced,
}

impl StaleReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotCached => "not cached",
            Self::FingerprintChanged => "inputs changed",
            Self::ArtifactMissing => "artifact missing",
            Self::Forced => "forced",
        }
    }
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a job can reuse its artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Fresh,
    Stale(StaleReason),
}

impl Decision {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh)
    }
}

/// Non-fatal problem attached to a job result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// A declared input does not exist.
    MissingInput(PathBuf),
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput(path) => write!(f, "missing input {}", path.display()),
        }
    }
}

/// Outcome of one job.
#[derive(Debug)]
pub enum BuildOutcome {
    /// The artifact was up to date.
    Skipped,
    /// The artifact was rendered and written.
    Built,
    /// Rendering or writing failed.
    Failed(BuildError),
}

/// Result of one job in a batch.
#[derive(Debug)]
pub struct BuildResult {
    pub job_id: String,
    pub output_path: PathBuf,
    pub outcome: BuildOutcome,
    pub warnings: Vec<BuildWarning>,
    /// Time spent rendering and writing. Zero for skipped jobs.
    pub duration: Duration,
    /// Why the job was rendered. `None` for skipped jobs.
    pub reason: Option<StaleReason>,
}

impl BuildResult {
    /// Creates a result for an up-to-date job.
    pub fn skipped(job_id: impl Into<String>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            job_id: job_id.into(),
            output_path: output_path.into(),
            outcome: BuildOutcome::Skipped,
            warnings: Vec::new(),
            duration: Duration::ZERO,
            reason: None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, BuildOutcome::Skipped)
    }

    pub fn is_built(&self) -> bool {
        matches!(self.outcome, BuildOutcome::Built)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, BuildOutcome::Failed(_))
    }

    /// Returns the failure, if any.
    pub fn error(&self) -> Option<&BuildError> {
        match &self.outcome {
            BuildOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Short status label used in reports.
    pub fn status(&self) -> &'static str {
        match self.outcome {
            BuildOutcome::Skipped => "skipped",
            BuildOutcome::Built => "built",
            BuildOutcome::Failed(_) => "failed",
        }
    }
}

/// Counts over a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub total: usize,
    pub built: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BuildSummary {
    /// Creates a summary from results.
    pub fn from_results(results: &[BuildResult]) -> Self {
        let mut summary = Self::default();

        for result in results {
            summary.total += 1;
            match result.outcome {
                BuildOutcome::Skipped => summary.skipped += 1,
                BuildOutcome::Built => summary.built += 1,
                BuildOutcome::Failed(_) => summary.failed += 1,
            }
        }

        summary
    }
}

/// Everything a batch produced.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Per-job results in submission order.
    pub results: Vec<BuildResult>,
    /// Set when the store could not be written back.
    pub persist_error: Option<CacheError>,
    /// Set when the batch stopped early.
    pub interrupted: bool,
    pub elapsed: Duration,
}

impl BuildReport {
    pub fn summary(&self) -> BuildSummary {
        BuildSummary::from_results(&self.results)
    }

    /// Returns `true` if any job failed.
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(BuildResult::is_failed)
    }

    /// Returns `true` if every job succeeded and the store was saved.
    pub fn is_success(&self) -> bool {
        !self.has_failures() && self.persist_error.is_none() && !self.interrupted
    }

    /// Iterates over failed results.
    pub fn failures(&self) -> impl Iterator<Item = &BuildResult> {
        self.results.iter().filter(|r| r.is_failed())
    }
}
