//! Merge configuration.
//!
//! The discovery prefix and consolidation strategy vary between report
//! pipelines, so both are configuration rather than hardcoded choices.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How shard reports are handed to the external merge tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ConsolidationStrategy {
    /// Union all shard files into one temporary directory first, skipping a
    /// file when an earlier shard already supplied the same path.
    #[default]
    CopyFirstWins,
    /// Pass the shard directories straight to the merge tool.
    DirectShardPaths,
}

/// Configuration for a shard-report merge run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Artifact name prefix kind, e.g. `blob-report` or `playwright-report`.
    pub artifact_kind: String,

    /// Node version encoded in shard artifact names.
    pub node_version: String,

    /// Consolidation strategy.
    pub strategy: ConsolidationStrategy,

    /// Scratch directory for per-cell consolidation, resolved relative to the
    /// working directory. Removed unconditionally at the end of a run.
    pub scratch_root: PathBuf,

    /// Whether per-cell destination directories carry a `-node<version>`
    /// suffix in addition to the cell name.
    pub dest_node_suffix: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            artifact_kind: "blob-report".to_string(),
            node_version: "20".to_string(),
            strategy: ConsolidationStrategy::default(),
            scratch_root: PathBuf::from("temp-blob-reports"),
            dest_node_suffix: false,
        }
    }
}

impl MergeConfig {
    /// Sets the artifact kind prefix.
    pub fn with_artifact_kind(mut self, kind: impl Into<String>) -> Self {
        self.artifact_kind = kind.into();
        self
    }

    /// Sets the node version.
    pub fn with_node_version(mut self, version: impl Into<String>) -> Self {
        self.node_version = version.into();
        self
    }

    /// Sets the consolidation strategy.
    pub fn with_strategy(mut self, strategy: ConsolidationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the scratch root directory.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = root.into();
        self
    }

    /// Enables the `-node<version>` suffix on destination directories.
    pub fn with_dest_node_suffix(mut self, enabled: bool) -> Self {
        self.dest_node_suffix = enabled;
        self
    }

    /// Loads configuration from a TOML file.
    ///
    /// Missing keys fall back to their defaults, so a file may override just
    /// the artifact kind or just the strategy.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MergeConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.artifact_kind.trim().is_empty() {
            return Err(Error::Config("artifact_kind cannot be empty".to_string()));
        }
        if self.node_version.trim().is_empty() {
            return Err(Error::Config("node_version cannot be empty".to_string()));
        }
        if !self.node_version.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::Config(format!(
                "node_version must be numeric, got '{}'",
                self.node_version
            )));
        }
        if self.scratch_root.as_os_str().is_empty() {
            return Err(Error::Config("scratch_root cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Returns the destination directory name for a cell.
    pub fn dest_name(&self, cell_name: &str) -> String {
        if self.dest_node_suffix {
            format!("{}-node{}", cell_name, self.node_version)
        } else {
            cell_name.to_string()
        }
    }
}
