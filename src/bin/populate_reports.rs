//! Report index population CLI
//!
//! Fills the reports index page with cards for each merged report.

use std::path::PathBuf;

use matrix_merge::populate_index;

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let reports_dir = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("final-report"));

    match populate_index(&reports_dir) {
        Ok(summary) => {
            println!(
                "Populated index with {} report(s)",
                summary.total_reports
            );
            if summary.total_reports == 0 {
                eprintln!("Warning: no reports found. Did the matrix jobs complete?");
            }
        }
        Err(e) => {
            eprintln!("Populate failed: {}", e);
            std::process::exit(1);
        }
    }
}
