//! Persistent mapping from output path to fingerprint.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{CacheError, Fingerprint};

/// What happened when the store was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The store has not been loaded yet.
    NotLoaded,
    /// Caching is disabled; nothing was read.
    Disabled,
    /// No store file existed.
    Missing,
    /// The store file was read successfully with this many entries.
    Loaded(usize),
    /// The store file could not be parsed and was treated as empty.
    Corrupt(String),
}

/// Fingerprints of previously built artifacts, keyed by output path.
///
/// Keys are output paths with forward slashes, so a store written on one
/// platform reads the same on another.
#[derive(Debug)]
pub struct CacheStore {
    /// Location of the store file.
    path: PathBuf,
    /// In-memory entries.
    entries: BTreeMap<String, Fingerprint>,
    /// Whether cache is enabled.
    enabled: bool,
    /// Outcome of the last load.
    status: LoadStatus,
}

impl CacheStore {
    /// Creates an empty, enabled store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
            enabled: true,
            status: LoadStatus::NotLoaded,
        }
    }

    /// Opens the store at `path`.
    ///
    /// Never fails: a missing file yields an empty store and a malformed file
    /// yields an empty store with [`LoadStatus::Corrupt`].
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(path);
        store.reload();
        store
    }

    /// Re-reads the store file, replacing the in-memory entries.
    pub fn reload(&mut self) {
        match self.try_load() {
            Ok(()) => {}
            Err(CacheError::Corrupted { path, reason }) => {
                warn!(
                    "Cache store {} is corrupted, starting empty: {}",
                    path.display(),
                    reason
                );
                self.entries.clear();
                self.status = LoadStatus::Corrupt(reason);
            }
            Err(e) => {
                warn!("Failed to load cache store, starting empty: {}", e);
                self.entries.clear();
                self.status = LoadStatus::Corrupt(e.to_string());
            }
        }
    }

    /// Reads the store file, reporting parse failures as errors.
    ///
    /// On error the in-memory entries are left untouched.
    pub fn try_load(&mut self) -> Result<(), CacheError> {
        if !self.enabled {
            self.status = LoadStatus::Disabled;
            return Ok(());
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No cache file found at {}", self.path.display());
                self.entries.clear();
                self.status = LoadStatus::Missing;
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Err(CacheError::corrupted(&self.path, e.to_string()));
            }
            Err(e) => {
                return Err(CacheError::Read {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let entries: BTreeMap<String, Fingerprint> = serde_json::from_str(&content)
            .map_err(|e| CacheError::corrupted(&self.path, e.to_string()))?;

        info!("Loaded {} cache entries", entries.len());
        self.status = LoadStatus::Loaded(entries.len());
        self.entries = entries;

        Ok(())
    }

    /// Normalizes an output path into a store key.
    pub fn key(path: &Path) -> String {
        let key = path.to_string_lossy();
        if std::path::MAIN_SEPARATOR == '/' {
            key.into_owned()
        } else {
            key.replace(std::path::MAIN_SEPARATOR, "/")
        }
    }

    /// Disables caching.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Enables caching.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Returns whether caching is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the store file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the outcome of the last load.
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Gets the stored fingerprint for an output path.
    pub fn get(&self, output: &Path) -> Option<&Fingerprint> {
        if !self.enabled {
            return None;
        }
        self.entries.get(&Self::key(output))
    }

    /// Records the fingerprint of a freshly built output.
    pub fn set(&mut self, output: &Path, fingerprint: Fingerprint) {
        if self.enabled {
            self.entries.insert(Self::key(output), fingerprint);
        }
    }

    /// Removes an entry.
    pub fn remove(&mut self, output: &Path) -> Option<Fingerprint> {
        self.entries.remove(&Self::key(output))
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Fingerprint)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Writes the full mapping to disk atomically.
    ///
    /// The JSON is written to a temporary file next to the store, flushed to
    /// disk, then renamed over the store file.
    pub fn save(&self) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| CacheError::write(&dir, e))?;

        let mut content = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        content.push('\n');

        let mut tmp = tempfile::Builder::new()
            .prefix(".charts-")
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| CacheError::write(&dir, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| CacheError::write(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| CacheError::write(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| CacheError::write(&self.path, e.error))?;

        info!(
            "Saved {} cache entries to {}",
            self.entries.len(),
            self.path.display()
        );

        Ok(())
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
