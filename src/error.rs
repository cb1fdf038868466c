//! Error types for the matrix-merge crate.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for merge operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The top-level reports directory does not exist.
    #[error("reports directory not found: {0}")]
    InputDirMissing(PathBuf),

    /// No shard report directories matched a matrix cell's prefix.
    #[error("no shard reports found for {0}")]
    NoShardReports(String),

    /// The external report-merge tool failed.
    #[error("report merge tool failed: {0}")]
    MergeTool(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The index template required by report population is missing.
    #[error("index template not found: {0}")]
    IndexTemplateMissing(PathBuf),

    /// IO error during filesystem operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for merge operations.
pub type Result<T> = std::result::Result<T, Error>;
