//! Merge metadata sidecar.
//!
//! Every merged report carries a `matrix-info.json` describing its
//! provenance. The field names are the wire contract consumed by the
//! report index population step.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matrix::MatrixCell;

/// Filename of the metadata sidecar written next to each merged report.
pub const METADATA_FILENAME: &str = "matrix-info.json";

/// CI run context captured from the environment.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Source-control ref the run was triggered from.
    pub git_ref: String,
    /// CI run identifier.
    pub run_id: String,
}

impl RunContext {
    /// Reads the run context from `GITHUB_REF` and `GITHUB_RUN_ID`.
    ///
    /// Both default to `"unknown"` outside CI.
    pub fn from_env() -> Self {
        Self {
            git_ref: std::env::var("GITHUB_REF").unwrap_or_else(|_| "unknown".to_string()),
            run_id: std::env::var("GITHUB_RUN_ID").unwrap_or_else(|_| "unknown".to_string()),
        }
    }
}

/// Provenance record for one merged matrix-cell report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeMetadata {
    /// Platform the shards ran on.
    pub os: String,
    /// Browser engine the shards ran against.
    pub browser: String,
    /// Node version used by the shard jobs.
    pub node_version: String,
    /// Human-readable shard range descriptor.
    pub shards: String,
    /// Number of shard directories that were merged.
    pub shards_count: usize,
    /// RFC 3339 timestamp of the merge.
    pub timestamp: String,
    /// Source-control ref.
    pub git_ref: String,
    /// CI run identifier.
    pub run_id: String,
}

impl MergeMetadata {
    /// Builds the metadata record for a merged cell.
    pub fn for_cell(
        cell: &MatrixCell,
        node_version: &str,
        shards_count: usize,
        context: &RunContext,
    ) -> Self {
        Self {
            os: cell.platform.to_string(),
            browser: cell.browser.to_string(),
            node_version: node_version.to_string(),
            shards: format!("1-{} (merged)", shards_count),
            shards_count,
            timestamp: Utc::now().to_rfc3339(),
            git_ref: context.git_ref.clone(),
            run_id: context.run_id.clone(),
        }
    }

    /// Writes the sidecar as pretty JSON into `dir` and returns its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(METADATA_FILENAME);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// Loads a sidecar from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::MATRIX;

    fn test_context() -> RunContext {
        RunContext {
            git_ref: "refs/heads/main".to_string(),
            run_id: "1234".to_string(),
        }
    }

    #[test]
    fn metadata_serializes_with_camel_case_contract_fields() {
        let metadata = MergeMetadata::for_cell(&MATRIX[0], "20", 4, &test_context());
        let json = serde_json::to_string(&metadata).expect("failed to serialize");

        for field in [
            "\"os\"",
            "\"browser\"",
            "\"nodeVersion\"",
            "\"shards\"",
            "\"shardsCount\"",
            "\"timestamp\"",
            "\"gitRef\"",
            "\"runId\"",
        ] {
            assert!(json.contains(field), "missing {} in {}", field, json);
        }
    }

    #[test]
    fn metadata_derives_shard_range_from_count() {
        let metadata = MergeMetadata::for_cell(&MATRIX[0], "20", 3, &test_context());
        assert_eq!(metadata.shards, "1-3 (merged)");
        assert_eq!(metadata.shards_count, 3);
    }

    #[test]
    fn metadata_round_trips_through_sidecar_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let metadata = MergeMetadata::for_cell(&MATRIX[2], "20", 2, &test_context());

        let path = metadata.write_to(dir.path()).expect("failed to write sidecar");
        assert_eq!(path.file_name().unwrap(), METADATA_FILENAME);

        let loaded = MergeMetadata::load(&path).expect("failed to load sidecar");
        assert_eq!(loaded.os, "ubuntu-latest");
        assert_eq!(loaded.browser, "webkit");
        assert_eq!(loaded.shards_count, 2);
        assert_eq!(loaded.git_ref, "refs/heads/main");
    }

    #[test]
    fn run_context_defaults_to_unknown_without_env() {
        // Neither variable is set in the test environment.
        let context = RunContext::from_env();
        assert_eq!(context.git_ref, "unknown");
        assert_eq!(context.run_id, "unknown");
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let metadata = MergeMetadata::for_cell(&MATRIX[0], "20", 1, &test_context());
        assert!(chrono::DateTime::parse_from_rfc3339(&metadata.timestamp).is_ok());
    }
}
