//! Chart error types.

use std::path::PathBuf;

use thiserror::Error;

use chartsmith_core::RenderError;

/// Errors raised while building a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The chart declares no `data` file.
    #[error("chart has no 'data' file")]
    NoData,

    /// The chart parameters do not match the chart type.
    #[error("{kind}: {reason}")]
    Params { kind: &'static str, reason: String },

    /// The theme file exists but is malformed.
    #[error("Invalid theme {}: {reason}", path.display())]
    Theme { path: PathBuf, reason: String },

    /// The data file is not valid CSV.
    #[error("Invalid CSV {}: {reason}", path.display())]
    Csv { path: PathBuf, reason: String },

    /// A referenced column does not exist.
    #[error("Column '{column}' not found. Available columns: {}", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A column that must be numeric holds something else.
    #[error("Column '{column}' must be numeric, found '{value}'")]
    NotNumeric { column: String, value: String },

    /// I/O error.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ChartError> for RenderError {
    fn from(err: ChartError) -> Self {
        match err {
            ChartError::Params { .. } | ChartError::NoData => RenderError::params(err.to_string()),
            ChartError::Io { source, .. } => RenderError::Io(source),
            other => RenderError::data(other.to_string()),
        }
    }
}
