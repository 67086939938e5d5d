// 🚨 Error Taxonomy
// Fatal errors (fetch, parse) abort a run; per-row problems never surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Raised by a source data provider when a table cannot be retrieved
#[derive(Debug, Error)]
pub enum FetchError {
    /// Local source file could not be opened or read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV payload
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Transport failure (unreachable host, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Source answered with a non-success status
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Payload contained no usable table
    #[error("no table found in {0}")]
    NoTable(String),
}

/// Raised by a normalizer when a table's shape is fundamentally unusable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{table} table has no data rows")]
    EmptyTable { table: String },

    #[error("{table} table is missing required column(s): {}", columns.join(", "))]
    MissingColumns { table: String, columns: Vec<String> },
}

/// Single summarized cause propagated to the caller of a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unable to load data: {0}")]
    Fetch(#[from] FetchError),

    #[error("unable to parse data: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
