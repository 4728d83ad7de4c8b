// ⚠️ Error Types
// Failures of the data access layer
//
// None of these abort a load or a query on their own. Load errors are
// recorded per source and filter errors become a failed `FilterResult`.

use std::path::PathBuf;

// ============================================================================
// LOAD
// ============================================================================

/// Why a single dataset source could not be read.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("source file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} does not contain a JSON array")]
    NotAnArray(PathBuf),
}

// ============================================================================
// QUERY & EXPORT
// ============================================================================

/// Faults raised while evaluating a query against a collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("unknown filter field '{field}' for {kind}")]
    UnknownField { kind: String, field: String },
    #[error("Failed to fetch {0} data")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),
    #[error("unknown export format: {0} (expected json or csv)")]
    UnknownFormat(String),
    #[error("failed to serialize dataset: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
