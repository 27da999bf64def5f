//! Build error types.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that stop a build before any job runs.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The job list could not be loaded.
    #[error("Job list error: {0}")]
    Jobs(#[from] JobError),
}

impl BuilderError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Errors raised while reading chart specification files.
#[derive(Debug, Error)]
pub enum JobError {
    /// A spec file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A spec file is not valid YAML/JSON or has the wrong shape.
    #[error("Failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// A chart entry lacks a required field.
    #[error("Chart #{index} in {} is missing required field '{field}'", path.display())]
    MissingField {
        path: PathBuf,
        index: usize,
        field: &'static str,
    },

    /// Two charts write to the same output file.
    #[error("Charts '{first}' and '{second}' both write to {output}")]
    DuplicateOutput {
        output: String,
        first: String,
        second: String,
    },

    /// A spec file glob pattern is invalid.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Errors raised by a renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No renderer is registered for the chart type.
    #[error("Unknown chart type: {kind}. Available types: {}", available.join(", "))]
    UnknownKind { kind: String, available: Vec<String> },

    /// The chart parameters are missing or have the wrong type.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// The data file could not be used.
    #[error("Data error: {0}")]
    Data(String),

    /// I/O error while reading inputs.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Creates an invalid-parameters error.
    pub fn params(message: impl Into<String>) -> Self {
        Self::InvalidParams(message.into())
    }

    /// Creates a data error.
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }
}

/// Per-job failure. Never aborts the batch.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The renderer failed.
    #[error("Render failed for '{job_id}': {source}")]
    Render {
        job_id: String,
        #[source]
        source: RenderError,
    },

    /// The artifact could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
