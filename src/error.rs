use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Dataset loading
// ---------------------------------------------------------------------------

/// The trip table could not be loaded. Fatal for the whole session.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("dataset not found at {}", .0.display())]
    Missing(PathBuf),

    #[error("unsupported dataset extension: .{0}")]
    UnsupportedFormat(String),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("record {row} is malformed")]
    MalformedRecord {
        row: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to read dataset {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Summary statistics were requested for a selection with no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no records match the selected route and class")]
pub struct EmptyViewError;

// ---------------------------------------------------------------------------
// Forecast artifacts
// ---------------------------------------------------------------------------

/// A forecast artifact exists but could not be parsed.
#[derive(Debug, Error)]
pub enum ForecastParseError {
    #[error("forecast {} is missing column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("forecast {} row {row}: {reason}", .path.display())]
    BadRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    #[error("failed to read forecast {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
