//! Source loading: find and read report data.
//!
//! This module handles the first stage of the pipeline - getting datasets
//! into memory. It provides:
//!
//! - **Report discovery**: find dashboard scripts under a directory
//! - **Dashboard extraction**: read the datasets a dashboard embeds
//! - **Dataset files**: load a single dataset from a JSON file
//!
//! ## Example
//!
//! ```rust,ignore
//! use reporttablelib::source::{discover_dashboards, load_report, FilterConfig};
//!
//! let filter = FilterConfig::new().exclude("**/old/**")?;
//! for path in discover_dashboards("reports", &filter)? {
//!     let report = load_report(&path)?;
//!     println!("{}: {} tables", report.name, report.tables.len());
//! }
//! ```

pub mod dashboard;
pub mod filter;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::data::dataset::Dataset;
use crate::data::report::Report;
use crate::error::ReportTableError;
use crate::Result;

pub use dashboard::{load_dashboard, parse_dashboard};
pub use filter::{discover_dashboards, FilterConfig, DASHBOARD_FILE};

/// Locations of the dashboard script relative to a report directory.
const DASHBOARD_LOCATIONS: [&str; 3] = ["content/js", "js", ""];

/// Resolve a report path to its dashboard script.
///
/// Files are returned as-is. For directories the usual report layouts are
/// tried in order: `content/js/dashboard.js`, `js/dashboard.js`, then
/// `dashboard.js`.
pub fn resolve_dashboard(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ReportTableError::PathNotFound(path.to_path_buf()));
    }
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    DASHBOARD_LOCATIONS
        .iter()
        .map(|dir| path.join(dir).join(DASHBOARD_FILE))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ReportTableError::Extract {
            path: path.to_path_buf(),
            message: format!("no {} found in report directory", DASHBOARD_FILE),
        })
}

/// Name of the report a dashboard script belongs to.
///
/// This is the directory holding `content/js/dashboard.js` (or
/// `js/dashboard.js`) when the script sits in that layout, and the file
/// stem otherwise.
pub fn report_name(dashboard: &Path) -> String {
    let parent = dashboard.parent();
    let ancestors: Vec<&Path> = parent.into_iter().flat_map(|p| p.ancestors()).collect();

    let dir_name = |p: &Path| p.file_name().map(|n| n.to_string_lossy().into_owned());

    let report_dir = match ancestors.as_slice() {
        [js, content, report, ..] if dir_name(js).as_deref() == Some("js")
            && dir_name(content).as_deref() == Some("content") =>
        {
            dir_name(report)
        }
        [js, report, ..] if dir_name(js).as_deref() == Some("js") => dir_name(report),
        _ => None,
    };

    report_dir
        .or_else(|| {
            dashboard
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| dashboard.display().to_string())
}

/// Load a report from a report directory or a dashboard script.
pub fn load_report(path: impl AsRef<Path>) -> Result<Report> {
    let dashboard = resolve_dashboard(path)?;
    let name = report_name(&dashboard);
    debug!(path = %dashboard.display(), %name, "loading report");
    load_dashboard(&dashboard, name)
}

/// Load a single dataset from a JSON file.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ReportTableError::PathNotFound(path.to_path_buf()));
    }
    let json = fs::read_to_string(path).map_err(|source| ReportTableError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Dataset::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SCRIPT: &str = r##"createTable($("#statisticsTable"), {"supportsControllersDiscrimination": true, "titles": ["Label", "#Samples"], "items": [{"data": ["GET", 10], "isController": false}]}, null, [[0, 0]], 0);"##;

    #[test]
    fn test_report_name_from_layout() {
        assert_eq!(
            report_name(Path::new("/tmp/run-42/content/js/dashboard.js")),
            "run-42"
        );
        assert_eq!(report_name(Path::new("run-7/js/dashboard.js")), "run-7");
        assert_eq!(report_name(Path::new("/tmp/saved/nightly.js")), "nightly");
    }

    #[test]
    fn test_resolve_dashboard_layouts() {
        let dir = tempdir().unwrap();
        let js = dir.path().join("run/content/js");
        fs::create_dir_all(&js).unwrap();
        fs::write(js.join(DASHBOARD_FILE), SCRIPT).unwrap();

        let resolved = resolve_dashboard(dir.path().join("run")).unwrap();
        assert_eq!(resolved, js.join(DASHBOARD_FILE));

        let flat = dir.path().join("flat");
        fs::create_dir_all(&flat).unwrap();
        fs::write(flat.join(DASHBOARD_FILE), SCRIPT).unwrap();
        assert_eq!(resolve_dashboard(&flat).unwrap(), flat.join(DASHBOARD_FILE));
    }

    #[test]
    fn test_resolve_dashboard_missing_script() {
        let dir = tempdir().unwrap();
        let err = resolve_dashboard(dir.path()).unwrap_err();
        assert!(matches!(err, ReportTableError::Extract { .. }));
    }

    #[test]
    fn test_load_report_names_directory() {
        let dir = tempdir().unwrap();
        let js = dir.path().join("nightly-build/content/js");
        fs::create_dir_all(&js).unwrap();
        fs::write(js.join(DASHBOARD_FILE), SCRIPT).unwrap();

        let report = load_report(dir.path().join("nightly-build")).unwrap();
        assert_eq!(report.name, "nightly-build");
        assert_eq!(report.tables.len(), 1);
    }

    #[test]
    fn test_load_dataset() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("table.json");
        fs::write(
            &file,
            r#"{"titles": ["Label", "Count"], "items": [{"data": ["GET", 3]}]}"#,
        )
        .unwrap();

        let dataset = load_dataset(&file).unwrap();
        assert_eq!(dataset.titles, ["Label", "Count"]);
        assert_eq!(dataset.items.len(), 1);
        assert!(!dataset.items[0].is_controller);

        let missing = load_dataset(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ReportTableError::PathNotFound(_))));
    }
}
