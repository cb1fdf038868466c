//! Report-merge tool integrations.
//!
//! The merge pipeline delegates the actual report generation to an external
//! tool behind the [`ReportMerger`] trait, so tests can substitute a fake
//! that writes a synthetic report tree.

mod playwright;

pub use playwright::PlaywrightMerger;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Input handed to the merge tool for one matrix cell.
#[derive(Debug, Clone)]
pub enum MergeInput {
    /// A single directory containing the union of all shard files.
    Consolidated(PathBuf),
    /// The shard directories themselves, passed through unmodified.
    ShardPaths(Vec<PathBuf>),
}

/// Trait for external report-merge tools.
pub trait ReportMerger {
    /// Runs the merge synchronously, blocking until the tool exits.
    ///
    /// On success the generated report is available under [`output_dir`].
    ///
    /// [`output_dir`]: ReportMerger::output_dir
    fn merge(&self, input: &MergeInput) -> Result<()>;

    /// Directory the tool writes its generated report into.
    fn output_dir(&self) -> &Path;

    /// Returns the name of this merger.
    fn name(&self) -> &str;
}
