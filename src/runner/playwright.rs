//! Playwright merge-reports runner.
//!
//! Wraps `npx playwright merge-reports` for generating one HTML report from
//! a set of blob reports.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

use super::{MergeInput, ReportMerger};

/// Default directory Playwright writes the generated HTML report into.
const DEFAULT_OUTPUT_DIR: &str = "playwright-report";

/// Merger backed by the Playwright CLI.
pub struct PlaywrightMerger {
    /// Path to the npx binary.
    npx_path: String,
    /// Working directory for the invocation.
    working_dir: PathBuf,
    /// Directory the generated report lands in.
    output_dir: PathBuf,
}

impl PlaywrightMerger {
    /// Creates a merger running in `working_dir` with Playwright's default
    /// output directory.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        let output_dir = working_dir.join(DEFAULT_OUTPUT_DIR);
        Self {
            npx_path: "npx".to_string(),
            working_dir,
            output_dir,
        }
    }

    /// Overrides the npx binary path.
    pub fn with_npx_path(mut self, path: impl Into<String>) -> Self {
        self.npx_path = path.into();
        self
    }

    /// Overrides the report output directory.
    ///
    /// Non-default directories are exported to the tool via
    /// `PLAYWRIGHT_HTML_REPORT`.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Builds the command arguments for a merge invocation.
    fn build_args(&self, input: &MergeInput) -> Vec<String> {
        let mut args = vec![
            "playwright".to_string(),
            "merge-reports".to_string(),
            "--reporter".to_string(),
            "html".to_string(),
        ];

        match input {
            MergeInput::Consolidated(dir) => {
                args.push(dir.display().to_string());
            }
            MergeInput::ShardPaths(dirs) => {
                for dir in dirs {
                    args.push(dir.display().to_string());
                }
            }
        }

        args
    }
}

impl ReportMerger for PlaywrightMerger {
    fn merge(&self, input: &MergeInput) -> Result<()> {
        let args = self.build_args(input);

        tracing::info!(
            npx = %self.npx_path,
            working_dir = ?self.working_dir,
            "invoking playwright merge-reports"
        );

        // Inherit stdio so the tool's progress output reaches the CI log.
        let status = Command::new(&self.npx_path)
            .current_dir(&self.working_dir)
            .env("PLAYWRIGHT_HTML_REPORT", &self.output_dir)
            .args(&args)
            .status()
            .map_err(|e| Error::MergeTool(format!("failed to run {}: {}", self.npx_path, e)))?;

        if !status.success() {
            return Err(Error::MergeTool(format!(
                "playwright merge-reports exited with {}",
                status
            )));
        }

        Ok(())
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn name(&self) -> &str {
        "playwright-merge-reports"
    }
}
