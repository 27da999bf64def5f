//! Cache error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the cache store.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to read the store file.
    #[error("Failed to read cache {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the store file.
    #[error("Failed to write cache {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but does not hold a valid mapping.
    #[error("Corrupted cache {}: {reason}", path.display())]
    Corrupted { path: PathBuf, reason: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CacheError {
    /// Creates a corrupted cache error.
    pub fn corrupted(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corrupted {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
