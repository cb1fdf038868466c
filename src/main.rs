//! Shard-report merge CLI
//!
//! Merges per-shard report artifacts into one report per OS/browser matrix
//! cell.

use std::path::{Path, PathBuf};

use matrix_merge::{MergeConfig, PlaywrightMerger, ShardReportMerger, MATRIX};

/// Optional configuration file looked up in the working directory.
const CONFIG_FILE: &str = "merge-reports.toml";

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <all-reports-dir> <merged-reports-dir>", args[0]);
        eprintln!("\nMerges shard report artifacts by OS/browser matrix cell.");
        eprintln!("\nEnvironment variables:");
        eprintln!("  GITHUB_REF     Source-control ref recorded in metadata (default: unknown)");
        eprintln!("  GITHUB_RUN_ID  CI run id recorded in metadata (default: unknown)");
        std::process::exit(1);
    }

    let all_reports_dir = PathBuf::from(&args[1]);
    let merged_reports_dir = PathBuf::from(&args[2]);

    if !all_reports_dir.is_dir() {
        eprintln!("Error: directory not found: {}", all_reports_dir.display());
        std::process::exit(1);
    }

    let config = load_config();
    let working_dir = std::env::current_dir().expect("failed to get current directory");

    let merger = ShardReportMerger::new(PlaywrightMerger::new(working_dir)).with_config(config);

    match merger.run(&all_reports_dir, &merged_reports_dir) {
        Ok(summary) => {
            println!("\n{}", "=".repeat(60));
            println!("Merge Summary");
            println!("{}", "=".repeat(60));
            println!();
            println!("  Successful: {}", summary.success_count);
            println!("  Failed:     {}", summary.failure_count);
            println!("  Total:      {}", MATRIX.len());
            println!();

            if summary.failure_count > 0 {
                // Partial success is not fatal; CI decides what to do with it.
                eprintln!(
                    "Warning: {} combination(s) failed to merge",
                    summary.failure_count
                );
            }
        }
        Err(e) => {
            eprintln!("Merge failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Loads the merge configuration, honoring an optional TOML file in the
/// working directory.
fn load_config() -> MergeConfig {
    let path = Path::new(CONFIG_FILE);
    if !path.exists() {
        return MergeConfig::default();
    }

    match MergeConfig::from_toml_file(path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "loaded merge configuration");
            config
        }
        Err(e) => {
            eprintln!("Error: invalid {}: {}", CONFIG_FILE, e);
            std::process::exit(1);
        }
    }
}
