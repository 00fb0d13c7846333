//! Extract report data from a dashboard script.
//!
//! Generated dashboards embed their data as JSON literals inside
//! JavaScript:
//!
//! ```text
//! var showControllersOnly = false;
//! var seriesFilter = "";
//! var filtersOnlySampleSeries = true;
//! ...
//! var data = {"OkPercent": 86.12, "KoPercent": 13.87};
//! ...
//! createTable($("#apdexTable"), {"supportsControllersDiscrimination": true, ...}, ...);
//! ```
//!
//! Each JSON literal is read with a streaming deserializer starting right
//! after its marker, so the surrounding script does not need to be parsed.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::data::dataset::Dataset;
use crate::data::report::{Report, ReportTable, RequestsSummary, TableKind};
use crate::error::ReportTableError;
use crate::query::options::RenderOptions;
use crate::Result;

const TABLE_CALL: &str = r#"createTable\(\s*\$\(\s*["']#([A-Za-z0-9_]+)["']\s*\)\s*,"#;
const SUMMARY_VAR: &str = r"var\s+data\s*=";
const DISPLAY_VAR: &str =
    r"var\s+(showControllersOnly|seriesFilter|filtersOnlySampleSeries)\s*=\s*([^;\n]+);";

/// Read and parse a dashboard script.
pub fn load_dashboard(path: impl AsRef<Path>, name: impl Into<String>) -> Result<Report> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ReportTableError::PathNotFound(path.to_path_buf()));
    }
    let script = fs::read_to_string(path).map_err(|source| ReportTableError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dashboard(&script, name, path)
}

/// Parse the data embedded in a dashboard script.
///
/// Fails if none of the standard tables is present or if a table's JSON
/// literal is malformed.
pub fn parse_dashboard(script: &str, name: impl Into<String>, path: &Path) -> Result<Report> {
    let extract_error = |message: String| ReportTableError::Extract {
        path: path.to_path_buf(),
        message,
    };
    let compile = |pattern: &str| Regex::new(pattern).map_err(|e| extract_error(e.to_string()));

    let mut tables = Vec::new();
    for caps in compile(TABLE_CALL)?.captures_iter(script) {
        let id = &caps[1];
        let Some(kind) = TableKind::ALL.into_iter().find(|k| k.element_id() == id) else {
            debug!(id, "ignoring unknown table");
            continue;
        };
        let end = caps.get(0).map_or(0, |m| m.end());
        let dataset: Dataset = first_json_value(&script[end..])
            .map_err(|e| extract_error(format!("table '{}': {}", id, e)))?;
        debug!(
            table = %kind,
            items = dataset.items.len(),
            "extracted dataset"
        );
        tables.push(ReportTable { kind, dataset });
    }

    if tables.is_empty() {
        return Err(extract_error("no report tables found".to_string()));
    }

    let summary = match compile(SUMMARY_VAR)?.find(script) {
        Some(m) => match first_json_value::<RequestsSummary>(&script[m.end()..]) {
            Ok(summary) => Some(summary),
            Err(e) => {
                debug!(error = %e, "requests summary not readable");
                None
            }
        },
        None => None,
    };

    let defaults = parse_display_defaults(script, &compile(DISPLAY_VAR)?);

    Ok(Report {
        name: name.into(),
        path: path.to_path_buf(),
        summary,
        defaults,
        tables,
    })
}

/// Deserialize the first JSON value of `text`, ignoring what follows it.
fn first_json_value<T: DeserializeOwned>(text: &str) -> std::result::Result<T, serde_json::Error> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<T>();
    match stream.next() {
        Some(result) => result,
        None => Err(serde::de::Error::custom("missing JSON value")),
    }
}

/// Read the dashboard's initial display toggles; missing or unreadable
/// values keep their defaults.
fn parse_display_defaults(script: &str, pattern: &Regex) -> RenderOptions {
    let mut options = RenderOptions::default();
    for caps in pattern.captures_iter(script) {
        let value: serde_json::Value = match serde_json::from_str(caps[2].trim()) {
            Ok(v) => v,
            Err(e) => {
                debug!(variable = &caps[1], error = %e, "ignoring display default");
                continue;
            }
        };
        match (&caps[1], value) {
            ("showControllersOnly", serde_json::Value::Bool(b)) => {
                options.show_controllers_only = b;
            }
            ("filtersOnlySampleSeries", serde_json::Value::Bool(b)) => {
                options.filters_only_sample_series = b;
            }
            ("seriesFilter", serde_json::Value::String(s)) => {
                options = options.filter(s);
            }
            (variable, other) => {
                debug!(variable, value = %other, "unexpected display default");
            }
        }
    }
    options
}
