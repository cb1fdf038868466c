//! Shard-report merge orchestration.
//!
//! Walks the declared test matrix in order and, for each cell, discovers the
//! shard report directories, consolidates them, runs the external merge
//! tool, relocates the generated report, and writes the metadata sidecar.
//! A failing cell never aborts the run; outcomes are aggregated into a
//! [`RunSummary`] so the caller decides what partial success means.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ConsolidationStrategy, MergeConfig};
use crate::consolidate::{consolidate_shards, discover_shard_dirs, move_dir_entries};
use crate::error::{Error, Result};
use crate::matrix::{MatrixCell, MATRIX};
use crate::metadata::{MergeMetadata, RunContext};
use crate::runner::{MergeInput, ReportMerger};

/// Outcome of processing one matrix cell.
#[derive(Debug, Clone)]
pub struct CellOutcome {
    /// The matrix cell.
    pub cell: MatrixCell,
    /// Destination directory of the merged report, when the cell succeeded.
    pub dest: Option<PathBuf>,
    /// Number of shard directories merged.
    pub shards_count: usize,
    /// Failure message, when the cell failed.
    pub error: Option<String>,
}

impl CellOutcome {
    /// Returns true if the cell merged successfully.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate result of a merge run.
///
/// Partial failure is reported through the counters rather than an error so
/// CI can decide whether incomplete results are acceptable.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Cells that produced a merged report.
    pub success_count: usize,
    /// Cells that failed or had no shard reports.
    pub failure_count: usize,
    /// Per-cell outcomes, in matrix order.
    pub outcomes: Vec<CellOutcome>,
}

impl RunSummary {
    /// Total number of matrix cells processed.
    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }
}

/// Merges per-shard report artifacts into one report per matrix cell.
pub struct ShardReportMerger<M: ReportMerger> {
    merger: M,
    config: MergeConfig,
}

impl<M: ReportMerger> ShardReportMerger<M> {
    /// Creates a merger with the default configuration.
    pub fn new(merger: M) -> Self {
        Self {
            merger,
            config: MergeConfig::default(),
        }
    }

    /// Sets the merge configuration.
    pub fn with_config(mut self, config: MergeConfig) -> Self {
        self.config = config;
        self
    }

    /// Merges all shard reports under `all_reports_dir` into per-cell
    /// directories under `merged_reports_dir`.
    ///
    /// Fails fast only when `all_reports_dir` does not exist; every per-cell
    /// error is caught at the cell boundary and recorded in the summary.
    pub fn run(&self, all_reports_dir: &Path, merged_reports_dir: &Path) -> Result<RunSummary> {
        if !all_reports_dir.is_dir() {
            return Err(Error::InputDirMissing(all_reports_dir.to_path_buf()));
        }

        fs::create_dir_all(merged_reports_dir)?;

        let context = RunContext::from_env();
        let scratch_root = &self.config.scratch_root;
        let mut summary = RunSummary::default();

        for cell in MATRIX {
            let cell_name = cell.cell_name();
            tracing::info!(cell = %cell_name, "processing matrix cell");

            let temp_dir = scratch_root.join(&cell_name);
            let result =
                self.process_cell(cell, all_reports_dir, merged_reports_dir, &temp_dir, &context);

            // The per-cell scratch directory must not outlive the cell,
            // whether it succeeded or failed.
            if temp_dir.exists() {
                if let Err(e) = fs::remove_dir_all(&temp_dir) {
                    tracing::warn!(path = ?temp_dir, error = %e, "failed to remove cell scratch dir");
                }
            }

            match result {
                Ok(outcome) => {
                    tracing::info!(
                        cell = %cell_name,
                        shards = outcome.shards_count,
                        "merged cell report"
                    );
                    summary.success_count += 1;
                    summary.outcomes.push(outcome);
                }
                Err(e) => {
                    tracing::warn!(cell = %cell_name, error = %e, "failed to merge cell");
                    summary.failure_count += 1;
                    summary.outcomes.push(CellOutcome {
                        cell: *cell,
                        dest: None,
                        shards_count: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        if scratch_root.exists() {
            if let Err(e) = fs::remove_dir_all(scratch_root) {
                tracing::warn!(path = ?scratch_root, error = %e, "failed to remove scratch root");
            }
        }

        tracing::info!(
            success = summary.success_count,
            failed = summary.failure_count,
            total = summary.total(),
            "merge run complete"
        );

        Ok(summary)
    }

    fn process_cell(
        &self,
        cell: &MatrixCell,
        all_reports_dir: &Path,
        merged_reports_dir: &Path,
        temp_dir: &Path,
        context: &RunContext,
    ) -> Result<CellOutcome> {
        let prefix = cell.shard_prefix(&self.config.artifact_kind, &self.config.node_version);
        let shard_dirs = discover_shard_dirs(all_reports_dir, &prefix)?;

        if shard_dirs.is_empty() {
            return Err(Error::NoShardReports(cell.cell_name()));
        }

        tracing::info!(
            cell = %cell.cell_name(),
            shards = shard_dirs.len(),
            "found shard reports"
        );

        let input = match self.config.strategy {
            ConsolidationStrategy::CopyFirstWins => {
                let copied = consolidate_shards(&shard_dirs, temp_dir)?;
                tracing::debug!(files = copied, "consolidated shard files");
                MergeInput::Consolidated(temp_dir.to_path_buf())
            }
            ConsolidationStrategy::DirectShardPaths => MergeInput::ShardPaths(shard_dirs.clone()),
        };

        self.merger.merge(&input)?;

        // The destination is only created once a report exists to put there.
        let dest = merged_reports_dir.join(self.config.dest_name(&cell.cell_name()));
        fs::create_dir_all(&dest)?;
        move_dir_entries(self.merger.output_dir(), &dest)?;

        let metadata =
            MergeMetadata::for_cell(cell, &self.config.node_version, shard_dirs.len(), context);
        metadata.write_to(&dest)?;

        Ok(CellOutcome {
            cell: *cell,
            dest: Some(dest),
            shards_count: shard_dirs.len(),
            error: None,
        })
    }
}
