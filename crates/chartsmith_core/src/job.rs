//! Chart jobs and spec file loading.
//!
//! A spec file holds a `charts` list. Every entry becomes one [`JobSpec`]:
//!
//! ```yaml
//! charts:
//!   - name: revenue
//!     type: line_multi
//!     data: data/revenue.csv
//!     output: docs/assets/charts/revenue.html
//!     params: { x: year, ys: [north, south], title: Revenue }
//!     inputs: [data/regions.csv]
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSetBuilder};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use chartsmith_cache::CacheStore;

use crate::config::resolve_path;
use crate::{BuildConfig, BuilderError, JobError};

/// One unit of renderable work.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec {
    /// Identifies the job within a batch.
    pub id: String,
    /// Chart type, used to pick a renderer.
    pub kind: String,
    /// The full chart entry as written in the spec file.
    pub content: Value,
    /// Files the job depends on, data file first.
    pub inputs: Vec<PathBuf>,
    /// Where the artifact is written; also the cache key.
    pub output_path: PathBuf,
}

impl JobSpec {
    /// Creates a job with no inputs. Content defaults to `{"type": kind}`.
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        let kind = kind.into();
        Self {
            id: id.into(),
            content: serde_json::json!({ "type": kind }),
            kind,
            inputs: Vec::new(),
            output_path: output_path.into(),
        }
    }

    /// Replaces the content payload.
    pub fn with_content(mut self, content: Value) -> Self {
        self.content = content;
        self
    }

    /// Appends an input dependency.
    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.inputs.push(path.into());
        self
    }

    /// Builds a job from one `charts` entry.
    ///
    /// `root` is the directory relative paths are resolved against.
    pub fn from_value(
        value: Value,
        index: usize,
        source: &Path,
        root: &Path,
    ) -> Result<Self, JobError> {
        let missing = |field| JobError::MissingField {
            path: source.to_path_buf(),
            index,
            field,
        };

        let Value::Object(map) = &value else {
            return Err(JobError::Parse {
                path: source.to_path_buf(),
                reason: format!("chart #{} is not a mapping", index),
            });
        };

        let id = map
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("unnamed-{}", index));
        let kind = map
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("type"))?
            .to_string();
        let output = map
            .get("output")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("output"))?;

        let mut inputs = Vec::new();
        if let Some(data) = map.get("data").and_then(Value::as_str) {
            inputs.push(resolve_path(root, Path::new(data)));
        }
        if let Some(extra) = map.get("inputs") {
            let Some(list) = extra.as_array() else {
                return Err(JobError::Parse {
                    path: source.to_path_buf(),
                    reason: format!("chart #{}: 'inputs' must be a list of paths", index),
                });
            };
            for item in list {
                let Some(p) = item.as_str() else {
                    return Err(JobError::Parse {
                        path: source.to_path_buf(),
                        reason: format!("chart #{}: 'inputs' entries must be strings", index),
                    });
                };
                inputs.push(resolve_path(root, Path::new(p)));
            }
        }

        let output_path = resolve_path(root, Path::new(output));

        Ok(Self {
            id,
            kind,
            inputs,
            output_path,
            content: value,
        })
    }

    /// Returns the chart parameters, or `Null` when absent.
    pub fn params(&self) -> &Value {
        self.content.get("params").unwrap_or(&Value::Null)
    }

    /// Returns the primary data file, if the chart declares one.
    pub fn data_path(&self) -> Option<&Path> {
        self.content
            .get("data")
            .and_then(Value::as_str)
            .and_then(|_| self.inputs.first())
            .map(PathBuf::as_path)
    }

    /// Returns the cache key for this job's output.
    pub fn cache_key(&self) -> String {
        CacheStore::key(&self.output_path)
    }
}

#[derive(Debug, Deserialize)]
struct SpecFile {
    #[serde(default)]
    charts: Vec<Value>,
}

/// Parses one spec file into jobs.
pub fn load_spec_file(path: &Path, root: &Path) -> Result<Vec<JobSpec>, JobError> {
    jobs_from_spec(read_spec_file(path)?, path, root)
}

/// Reads and parses a spec file without looking at its entries.
fn read_spec_file(path: &Path) -> Result<SpecFile, JobError> {
    let content = fs::read_to_string(path).map_err(|e| JobError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let parse_err = |reason: String| JobError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    if is_json {
        serde_json::from_str(&content).map_err(|e| parse_err(e.to_string()))
    } else if content.trim().is_empty() {
        Ok(SpecFile { charts: Vec::new() })
    } else {
        serde_yaml::from_str(&content).map_err(|e| parse_err(e.to_string()))
    }
}

fn jobs_from_spec(spec: SpecFile, path: &Path, root: &Path) -> Result<Vec<JobSpec>, JobError> {
    debug!("{} declares {} charts", path.display(), spec.charts.len());

    spec.charts
        .into_iter()
        .enumerate()
        .map(|(index, value)| JobSpec::from_value(value, index, path, root))
        .collect()
}

/// Expands spec patterns into existing spec files.
///
/// Plain paths are kept in order; a missing plain path is skipped with a
/// warning. Glob patterns are matched against files under `root` and added
/// in sorted order.
pub fn discover_spec_files(patterns: &[String], root: &Path) -> Result<Vec<PathBuf>, JobError> {
    let mut files = Vec::new();

    for pattern in patterns {
        if !is_glob(pattern) {
            let path = resolve_path(root, Path::new(pattern));
            if path.is_file() {
                files.push(path);
            } else {
                warn!("Spec file not found: {}", path.display());
            }
            continue;
        }

        let glob = Glob::new(pattern).map_err(|e| JobError::InvalidPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        let matcher = GlobSetBuilder::new()
            .add(glob)
            .build()
            .map_err(|e| JobError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;

        let walk_root = if root.as_os_str().is_empty() {
            Path::new(".")
        } else {
            root
        };

        let mut matched = Vec::new();
        for entry in WalkDir::new(walk_root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(walk_root).unwrap_or(entry.path());
            if matcher.is_match(relative) {
                matched.push(resolve_path(root, relative));
            }
        }

        if matched.is_empty() {
            warn!("No spec files match '{}'", pattern);
        }
        matched.sort();
        files.extend(matched);
    }

    let mut seen = std::collections::HashSet::new();
    files.retain(|p| seen.insert(p.clone()));

    Ok(files)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

/// Loads every job declared by the spec files in `config`.
///
/// A spec file that does not parse is skipped with a warning. Invalid chart
/// entries and two jobs sharing an output path are errors.
pub fn load_jobs(config: &BuildConfig) -> Result<Vec<JobSpec>, BuilderError> {
    let root = config.root();
    let files = discover_spec_files(&config.specs, root)?;

    let mut jobs = Vec::new();
    let mut loaded = 0;
    for file in &files {
        let spec = match read_spec_file(file) {
            Ok(spec) => spec,
            Err(e @ JobError::Parse { .. }) => {
                warn!("Skipping spec file: {}", e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        jobs.extend(jobs_from_spec(spec, file, root)?);
        loaded += 1;
    }

    check_unique_outputs(&jobs)?;

    info!("Loaded {} charts from {} spec file(s)", jobs.len(), loaded);
    Ok(jobs)
}

/// Rejects batches where two jobs target the same output.
pub fn check_unique_outputs(jobs: &[JobSpec]) -> Result<(), JobError> {
    let mut owners: HashMap<String, &str> = HashMap::with_capacity(jobs.len());
    for job in jobs {
        let key = job.cache_key();
        if let Some(first) = owners.get(&key) {
            return Err(JobError::DuplicateOutput {
                output: key,
                first: first.to_string(),
                second: job.id.clone(),
            });
        }
        owners.insert(key, &job.id);
    }
    Ok(())
}
