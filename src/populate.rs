//! Report index population.
//!
//! After merged reports are published, a static `index.html` template at the
//! root of the reports tree is patched with one card per merged report plus
//! aggregate stats. Report provenance comes from each report's
//! `matrix-info.json` sidecar; a report without a readable sidecar is still
//! listed under its directory name.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::metadata::{MergeMetadata, METADATA_FILENAME};

/// Marker for the report grid container in the index template.
const GRID_MARKER: &str = "<div class=\"report-grid\" id=\"reportGrid\">";
/// Marker for the total-reports stat in the index template.
const TOTAL_MARKER: &str = "<span class=\"stat-value\" id=\"totalReports\">0</span>";
/// Marker for the last-run stat in the index template.
const LAST_RUN_MARKER: &str = "<span class=\"stat-value\" id=\"lastRun\">-</span>";

/// Stats gathered while populating the index.
#[derive(Debug, Clone, Default)]
pub struct PopulateSummary {
    /// Number of report directories found.
    pub total_reports: usize,
    /// Most recent merge timestamp across all sidecars.
    pub last_run: Option<DateTime<Utc>>,
}

/// Scans `reports_dir` for merged reports and patches its `index.html`
/// template with report cards and stats.
///
/// A subdirectory counts as a report when it contains an `index.html`.
pub fn populate_index(reports_dir: &Path) -> Result<PopulateSummary> {
    if !reports_dir.is_dir() {
        return Err(Error::InputDirMissing(reports_dir.to_path_buf()));
    }

    let index_path = reports_dir.join("index.html");
    if !index_path.exists() {
        return Err(Error::IndexTemplateMissing(index_path));
    }

    let mut entries: Vec<_> = fs::read_dir(reports_dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|e| e.path())
        .collect();
    entries.sort();

    let mut summary = PopulateSummary::default();
    let mut cards = String::new();

    for path in entries {
        if !path.is_dir() || !path.join("index.html").exists() {
            continue;
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        summary.total_reports += 1;
        tracing::info!(report = %name, "found merged report");

        let metadata = load_sidecar(&path);

        let display_name = match &metadata {
            Some(m) => format!("{} - {} (Node {})", m.os, m.browser, m.node_version),
            None => name.clone(),
        };

        let timestamp = metadata.as_ref().and_then(|m| {
            DateTime::parse_from_rfc3339(&m.timestamp)
                .ok()
                .map(|t| t.with_timezone(&Utc))
        });
        if let Some(t) = timestamp {
            if summary.last_run.map_or(true, |last| t > last) {
                summary.last_run = Some(t);
            }
        }

        let generated = timestamp
            .map(|t| format!("Generated: {}", t.format("%d/%m/%Y %H:%M")))
            .unwrap_or_default();

        cards.push_str(&format!(
            "\n        <div class=\"report-card\">\n          \
             <div class=\"report-title\">{}</div>\n          \
             <div class=\"report-meta\">{}</div>\n          \
             <a href=\"{}/index.html\" class=\"report-link\">View Report</a>\n        </div>\n      ",
            display_name, generated, name
        ));
    }

    let mut content = fs::read_to_string(&index_path)?;
    content = content.replace(GRID_MARKER, &format!("{}{}", GRID_MARKER, cards));
    content = content.replace(
        TOTAL_MARKER,
        &format!(
            "<span class=\"stat-value\" id=\"totalReports\">{}</span>",
            summary.total_reports
        ),
    );
    let last_run_display = summary
        .last_run
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    content = content.replace(
        LAST_RUN_MARKER,
        &format!(
            "<span class=\"stat-value\" id=\"lastRun\">{}</span>",
            last_run_display
        ),
    );
    fs::write(&index_path, content)?;

    tracing::info!(
        total = summary.total_reports,
        "populated report index"
    );

    Ok(summary)
}

fn load_sidecar(report_dir: &Path) -> Option<MergeMetadata> {
    let sidecar = report_dir.join(METADATA_FILENAME);
    if !sidecar.exists() {
        return None;
    }
    match MergeMetadata::load(&sidecar) {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::warn!(path = ?sidecar, error = %e, "could not parse matrix info");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEMPLATE: &str = "<html><body>\
        <span class=\"stat-value\" id=\"totalReports\">0</span>\
        <span class=\"stat-value\" id=\"lastRun\">-</span>\
        <div class=\"report-grid\" id=\"reportGrid\"></div>\
        </body></html>";

    fn create_report_dir(root: &Path, name: &str, sidecar: Option<&str>) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).expect("failed to create report dir");
        fs::write(dir.join("index.html"), "<html></html>").expect("failed to write report");
        if let Some(json) = sidecar {
            fs::write(dir.join(METADATA_FILENAME), json).expect("failed to write sidecar");
        }
    }

    fn sidecar_json(os: &str, browser: &str, timestamp: &str) -> String {
        format!(
            "{{\"os\":\"{}\",\"browser\":\"{}\",\"nodeVersion\":\"20\",\
             \"shards\":\"1-2 (merged)\",\"shardsCount\":2,\"timestamp\":\"{}\",\
             \"gitRef\":\"unknown\",\"runId\":\"unknown\"}}",
            os, browser, timestamp
        )
    }

    #[test]
    fn populate_counts_only_dirs_with_index() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::write(temp.path().join("index.html"), TEMPLATE).expect("failed to write template");

        create_report_dir(temp.path(), "ubuntu-latest-chromium", None);
        // Directory without an index.html is not a report.
        fs::create_dir_all(temp.path().join("incomplete")).expect("failed to create dir");
        // Stray files are ignored.
        fs::write(temp.path().join("notes.txt"), "x").expect("failed to write file");

        let summary = populate_index(temp.path()).expect("populate failed");
        assert_eq!(summary.total_reports, 1);
    }

    #[test]
    fn populate_patches_all_template_markers() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::write(temp.path().join("index.html"), TEMPLATE).expect("failed to write template");

        create_report_dir(
            temp.path(),
            "ubuntu-latest-chromium",
            Some(&sidecar_json(
                "ubuntu-latest",
                "chromium",
                "2026-08-06T10:30:00+00:00",
            )),
        );

        let summary = populate_index(temp.path()).expect("populate failed");
        assert_eq!(summary.total_reports, 1);

        let content =
            fs::read_to_string(temp.path().join("index.html")).expect("failed to read index");
        assert!(content.contains("ubuntu-latest - chromium (Node 20)"));
        assert!(content.contains("id=\"totalReports\">1</span>"));
        assert!(content.contains("id=\"lastRun\">10:30</span>"));
        assert!(content.contains("href=\"ubuntu-latest-chromium/index.html\""));
    }

    #[test]
    fn populate_tracks_latest_run_across_reports() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::write(temp.path().join("index.html"), TEMPLATE).expect("failed to write template");

        create_report_dir(
            temp.path(),
            "ubuntu-latest-chromium",
            Some(&sidecar_json(
                "ubuntu-latest",
                "chromium",
                "2026-08-06T08:00:00+00:00",
            )),
        );
        create_report_dir(
            temp.path(),
            "macos-latest-webkit",
            Some(&sidecar_json(
                "macos-latest",
                "webkit",
                "2026-08-06T09:15:00+00:00",
            )),
        );

        let summary = populate_index(temp.path()).expect("populate failed");

        assert_eq!(summary.total_reports, 2);
        let last = summary.last_run.expect("last_run missing");
        assert_eq!(last.format("%H:%M").to_string(), "09:15");
    }

    #[test]
    fn populate_tolerates_corrupt_sidecar() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::write(temp.path().join("index.html"), TEMPLATE).expect("failed to write template");

        create_report_dir(temp.path(), "windows-latest-firefox", Some("not json"));

        let summary = populate_index(temp.path()).expect("populate failed");
        assert_eq!(summary.total_reports, 1);

        // Falls back to the directory name for display.
        let content =
            fs::read_to_string(temp.path().join("index.html")).expect("failed to read index");
        assert!(content.contains("windows-latest-firefox"));
    }

    #[test]
    fn populate_fails_on_missing_template() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let result = populate_index(temp.path());
        assert!(matches!(result, Err(Error::IndexTemplateMissing(_))));
    }

    #[test]
    fn populate_fails_on_missing_reports_dir() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let result = populate_index(&temp.path().join("nope"));
        assert!(matches!(result, Err(Error::InputDirMissing(_))));
    }
}
