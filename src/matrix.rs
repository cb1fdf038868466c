//! The OS/browser test matrix.
//!
//! The CI pipeline runs the suite across a fixed, asymmetric set of
//! platform/browser combinations. Each combination is one merge unit: all
//! shard reports for a cell collapse into a single browsable report.

/// One platform/browser combination in the test matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixCell {
    /// Platform identifier (CI runner image name).
    pub platform: &'static str,
    /// Browser engine identifier.
    pub browser: &'static str,
}

/// The declared test matrix, in processing order.
///
/// Not a full cross product: webkit is not exercised on Windows.
pub const MATRIX: &[MatrixCell] = &[
    MatrixCell { platform: "ubuntu-latest", browser: "chromium" },
    MatrixCell { platform: "ubuntu-latest", browser: "firefox" },
    MatrixCell { platform: "ubuntu-latest", browser: "webkit" },
    MatrixCell { platform: "windows-latest", browser: "chromium" },
    MatrixCell { platform: "windows-latest", browser: "firefox" },
    MatrixCell { platform: "macos-latest", browser: "chromium" },
    MatrixCell { platform: "macos-latest", browser: "firefox" },
    MatrixCell { platform: "macos-latest", browser: "webkit" },
];

impl MatrixCell {
    /// Returns the canonical cell name, e.g. `ubuntu-latest-chromium`.
    pub fn cell_name(&self) -> String {
        format!("{}-{}", self.platform, self.browser)
    }

    /// Returns the artifact name prefix that shard upload directories for
    /// this cell start with, e.g. `blob-report-ubuntu-latest-chromium-node20-shard`.
    pub fn shard_prefix(&self, artifact_kind: &str, node_version: &str) -> String {
        format!(
            "{}-{}-{}-node{}-shard",
            artifact_kind, self.platform, self.browser, node_version
        )
    }
}
