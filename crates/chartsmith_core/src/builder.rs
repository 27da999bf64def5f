//! Incremental build orchestration.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, info, warn};

use chartsmith_cache::{CacheStore, Fingerprint};

use crate::{
    BuildExecutor, BuildOutcome, BuildReport, BuildResult, BuildWarning, Decision, Fingerprinter,
    JobSpec, RendererRegistry, StaleReason,
};

/// The build orchestrator.
///
/// Walks a job list in order, skips jobs whose fingerprint matches the store
/// and whose artifact still exists, renders the rest, and writes the store
/// back once at the end.
pub struct Builder {
    registry: RendererRegistry,
    fingerprinter: Fingerprinter,
    /// Render every job regardless of the store.
    force: bool,
    /// Checked between jobs; when set the batch stops early.
    interrupt: Option<Arc<AtomicBool>>,
}

/// The decision for one job in a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedJob {
    pub job_id: String,
    pub output_path: PathBuf,
    pub decision: Decision,
    pub missing_inputs: Vec<PathBuf>,
}

impl Builder {
    /// Creates a builder that renders with `registry`.
    pub fn new(registry: RendererRegistry) -> Self {
        Self {
            registry,
            fingerprinter: Fingerprinter::new(),
            force: false,
            interrupt: None,
        }
    }

    /// Tracks a shared theme file in every fingerprint.
    pub fn with_theme(mut self, theme: impl Into<PathBuf>) -> Self {
        self.fingerprinter = Fingerprinter::with_theme(theme);
        self
    }

    /// Renders every job even when the store says it is up to date.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Stops the batch between jobs once `flag` is set.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Returns the renderer registry.
    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    /// Returns the fingerprinter in use.
    pub fn fingerprinter(&self) -> &Fingerprinter {
        &self.fingerprinter
    }

    /// Runs a batch.
    ///
    /// Per-job failures are recorded in the report and never stop the batch.
    /// The store is saved exactly once, after the loop, even when interrupted.
    pub fn run(&self, jobs: &[JobSpec], store: &mut CacheStore) -> BuildReport {
        let start = Instant::now();
        let executor = BuildExecutor::new(&self.registry);
        let mut report = BuildReport::default();

        info!("Building {} charts", jobs.len());

        for job in jobs {
            if self.is_interrupted() {
                warn!(
                    "Interrupted, {} of {} charts processed",
                    report.results.len(),
                    jobs.len()
                );
                report.interrupted = true;
                break;
            }

            report.results.push(self.run_job(&executor, job, store));
        }

        if let Err(e) = store.save() {
            warn!("Failed to save cache store: {}", e);
            report.persist_error = Some(e);
        }

        report.elapsed = start.elapsed();
        report
    }

    /// Decides, without rendering, which jobs a run would build.
    pub fn plan(&self, jobs: &[JobSpec], store: &CacheStore) -> Vec<PlannedJob> {
        jobs.iter()
            .map(|job| {
                let report = self.fingerprinter.fingerprint(job);
                PlannedJob {
                    job_id: job.id.clone(),
                    output_path: job.output_path.clone(),
                    decision: self.decide(job, &report.fingerprint, store),
                    missing_inputs: report.missing_inputs,
                }
            })
            .collect()
    }

    fn run_job(
        &self,
        executor: &BuildExecutor<'_>,
        job: &JobSpec,
        store: &mut CacheStore,
    ) -> BuildResult {
        let report = self.fingerprinter.fingerprint(job);

        let warnings: Vec<BuildWarning> = report
            .missing_inputs
            .into_iter()
            .map(|path| {
                warn!("Chart '{}': input not found: {}", job.id, path.display());
                BuildWarning::MissingInput(path)
            })
            .collect();

        let reason = match self.decide(job, &report.fingerprint, store) {
            Decision::Fresh => {
                info!("Skipped {} (up to date)", job.id);
                return BuildResult {
                    warnings,
                    ..BuildResult::skipped(&job.id, &job.output_path)
                };
            }
            Decision::Stale(reason) => reason,
        };

        debug!("Building {} ({})", job.id, reason);
        let started = Instant::now();
        let outcome = match executor.execute(job) {
            Ok(_) => {
                store.set(&job.output_path, report.fingerprint);
                info!("Built {} -> {}", job.id, job.output_path.display());
                BuildOutcome::Built
            }
            Err(e) => {
                warn!("Failed to build {}: {}", job.id, e);
                BuildOutcome::Failed(e)
            }
        };

        BuildResult {
            job_id: job.id.clone(),
            output_path: job.output_path.clone(),
            outcome,
            warnings,
            duration: started.elapsed(),
            reason: Some(reason),
        }
    }

    fn decide(&self, job: &JobSpec, current: &Fingerprint, store: &CacheStore) -> Decision {
        if self.force {
            return Decision::Stale(StaleReason::Forced);
        }
        match store.get(&job.output_path) {
            None => Decision::Stale(StaleReason::NotCached),
            Some(stored) if stored != current => Decision::Stale(StaleReason::FingerprintChanged),
            Some(_) if !job.output_path.exists() => Decision::Stale(StaleReason::ArtifactMissing),
            Some(_) => Decision::Fresh,
        }
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}
