//! Job fingerprinting.
//!
//! A fingerprint is computed in two passes. The chart entry is serialized
//! with sorted keys and hashed. That hex digest is then combined with the
//! modification time of every input (and of the shared theme file) and hashed
//! again. Each mtime term is tagged with its input index so a missing file
//! can never be confused with a shifted one.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde_json::Value;
use tracing::debug;

use chartsmith_cache::Fingerprint;

use crate::JobSpec;

/// Fingerprint of a job plus the inputs that could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintReport {
    pub fingerprint: Fingerprint,
    /// Declared inputs that did not exist. They contribute nothing to the
    /// fingerprint.
    pub missing_inputs: Vec<PathBuf>,
}

/// Computes job fingerprints.
#[derive(Debug, Clone, Default)]
pub struct Fingerprinter {
    /// Shared theme file, folded into every fingerprint when present.
    theme: Option<PathBuf>,
}

impl Fingerprinter {
    /// Creates a fingerprinter without a shared theme file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fingerprinter that also tracks the shared theme file.
    pub fn with_theme(theme: impl Into<PathBuf>) -> Self {
        Self {
            theme: Some(theme.into()),
        }
    }

    /// Returns the tracked theme file.
    pub fn theme(&self) -> Option<&Path> {
        self.theme.as_deref()
    }

    /// Fingerprints a job. Never fails: missing inputs are reported, not raised.
    pub fn fingerprint(&self, job: &JobSpec) -> FingerprintReport {
        let mut combined = content_hash(&job.content);
        let mut missing_inputs = Vec::new();

        for (index, input) in job.inputs.iter().enumerate() {
            match mtime_nanos(input) {
                Some(nanos) => {
                    let _ = write!(combined, ":{}={}", index, nanos);
                }
                None => missing_inputs.push(input.clone()),
            }
        }

        if let Some(theme) = &self.theme
            && let Some(nanos) = mtime_nanos(theme)
        {
            let _ = write!(combined, "|theme:{}", nanos);
        }

        let fingerprint = Fingerprint::hash(combined.as_bytes());
        debug!("Fingerprint for '{}': {}", job.id, fingerprint);

        FingerprintReport {
            fingerprint,
            missing_inputs,
        }
    }
}

/// Hashes the canonical form of a chart entry.
pub fn content_hash(content: &Value) -> String {
    blake3::hash(canonical_json(content).as_bytes())
        .to_hex()
        .to_string()
}

/// Serializes JSON compactly with object keys sorted at every level.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Last-modified time in nanoseconds since the Unix epoch.
///
/// `None` when the file does not exist or cannot be inspected.
fn mtime_nanos(path: &Path) -> Option<u128> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(
        modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default(),
    )
}
