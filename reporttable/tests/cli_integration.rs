//! Integration tests for reporttable CLI

use std::path::PathBuf;
use std::process::Command;

fn fixture(path: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(path)
        .to_string_lossy()
        .to_string()
}

fn run_reporttable(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_reporttable"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_reporttable(&["--help"]);

    assert!(success);
    assert!(stdout.contains("reporttable"));
    assert!(stdout.contains("--table"));
    assert!(stdout.contains("--filter"));
    assert!(stdout.contains("--format"));
    assert!(stdout.contains("scan"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_reporttable(&["--version"]);

    assert!(success);
    assert!(stdout.contains("reporttable"));
}

#[test]
fn test_text_output() {
    let (stdout, _, success) = run_reporttable(&[&fixture("reports/nightly")]);

    assert!(success);
    assert!(stdout.contains("nightly"));
    assert!(stdout.contains("Requests: 86.13% passed, 13.87% failed"));
    assert!(stdout.contains("APDEX (Application Performance Index)"));
    assert!(stdout.contains("Statistics"));
    assert!(stdout.contains("Response Times (ms)"));
    assert!(stdout.contains("Top 5 Errors by sampler"));
    assert!(stdout.contains("1 sec 500 ms"));
    assert!(stdout.contains("13.87%"));
}

#[test]
fn test_show_subcommand_matches_default() {
    let path = fixture("reports/nightly");
    let (default_out, _, _) = run_reporttable(&[&path, "--format", "csv"]);
    let (show_out, _, success) = run_reporttable(&["show", &path, "--format", "csv"]);

    assert!(success);
    assert_eq!(default_out, show_out);
}

#[test]
fn test_csv_statistics() {
    let (stdout, _, success) = run_reporttable(&[
        "show",
        &fixture("reports/nightly"),
        "--table",
        "statistics",
        "--format",
        "csv",
    ]);

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Statistics");
    assert!(lines[1].starts_with("Label,#Samples,FAIL,Error %,Average"));
    assert_eq!(
        lines[2],
        "Total,73494,10194,13.87%,1.00,0,30,1.00,2.00,2.00,3.00,250.01,224.88,52.48"
    );
    // Default sort: label ascending
    assert!(lines[3].starts_with("01- Get API,"));
    assert!(lines[4].starts_with("05- Delete API,"));
    assert!(lines[5].starts_with("Checkout flow,"));
    assert_eq!(lines.len(), 6);
}

#[test]
fn test_filter_keeps_overall_row() {
    let (stdout, _, success) = run_reporttable(&[
        &fixture("reports/nightly"),
        "-t",
        "statistics",
        "--filter",
        "DELETE",
        "--format",
        "csv",
    ]);

    assert!(success);
    assert!(stdout.contains("Total,73494"));
    assert!(stdout.contains("05- Delete API"));
    assert!(!stdout.contains("01- Get API"));
    assert!(!stdout.contains("Checkout flow"));
}

#[test]
fn test_filter_skips_tables_without_discrimination() {
    let (stdout, _, success) = run_reporttable(&[
        &fixture("reports/nightly"),
        "-t",
        "top-errors",
        "--filter",
        "delete",
        "--format",
        "csv",
    ]);

    assert!(success);
    assert!(stdout.contains("01- Get API"));

    let (stdout, _, success) = run_reporttable(&[
        &fixture("reports/nightly"),
        "-t",
        "top-errors",
        "--filter",
        "delete",
        "--filter-all-series",
        "--format",
        "csv",
    ]);

    assert!(success);
    assert!(!stdout.contains("01- Get API"));
    assert!(stdout.contains("05- Delete API"));
}

#[test]
fn test_controllers_only() {
    let (stdout, _, success) = run_reporttable(&[
        &fixture("reports/nightly"),
        "-t",
        "statistics",
        "-t",
        "errors",
        "--controllers-only",
        "--format",
        "csv",
    ]);

    assert!(success);
    assert!(stdout.contains("Checkout flow"));
    assert!(!stdout.contains("01- Get API"));
    // Errors table cannot tell controllers apart and keeps its rows
    assert!(stdout.contains("500/Internal Server Error"));
}

#[test]
fn test_errors_sorted_by_count() {
    let (stdout, _, success) = run_reporttable(&[
        &fixture("reports/nightly"),
        "-t",
        "errors",
        "--format",
        "csv",
    ]);

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[2].starts_with("Non HTTP response code"));
    assert!(lines[2].ends_with("8194,80.38%,11.15%"));
    assert!(lines[3].starts_with("500/Internal Server Error"));
}

#[test]
fn test_sort_override() {
    let (stdout, _, success) = run_reporttable(&[
        &fixture("reports/nightly"),
        "-t",
        "statistics",
        "--sort",
        "1:desc",
        "--format",
        "csv",
    ]);

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[3].starts_with("Checkout flow,44294"));
    assert!(lines[4].starts_with("01- Get API,14700"));
}

#[test]
fn test_json_output() {
    let (stdout, _, success) = run_reporttable(&[&fixture("reports/nightly"), "--output", "json"]);

    assert!(success);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert!(json.get("apdex").is_some());
    assert!(json.get("statistics").is_some());
    assert!(json.get("errors").is_some());
    assert!(json.get("top-errors").is_some());

    let stats = &json["statistics"];
    assert_eq!(stats["headers"][0], "Label");
    assert_eq!(stats["overall"]["cells"][3]["text"], "13.87%");
    assert_eq!(stats["sort"][0]["column"], 0);
    assert_eq!(stats["header_groups"][0][2]["label"], "Response Times (ms)");
}

#[test]
fn test_html_output() {
    let (stdout, _, success) = run_reporttable(&[
        &fixture("reports/nightly"),
        "-t",
        "apdex",
        "--format",
        "html",
    ]);

    assert!(success);
    assert!(stdout.contains("<table id=\"apdexTable\""));
    assert!(stdout.contains("<tbody class=\"tablesorter-no-sort\">"));
    assert!(stdout.contains("<td>0.861</td>"));
}

#[test]
fn test_dataset_file_with_raw_fallback() {
    let (stdout, stderr, success) =
        run_reporttable(&[&fixture("errors.json"), "-t", "errors", "--format", "csv"]);

    assert!(success);
    assert!(stdout.contains("500/Internal Server Error,2000,19.62%,2.72%"));
    assert!(stdout.contains("java.net.SocketException,8194,n/a,11.15%"));
    assert!(stderr.contains("WARN"));
}

#[test]
fn test_dataset_file_skip_row() {
    let (stdout, _, success) = run_reporttable(&[
        &fixture("errors.json"),
        "-t",
        "errors",
        "--on-format-error",
        "skip-row",
        "--format",
        "csv",
    ]);

    assert!(success);
    assert!(stdout.contains("500/Internal Server Error"));
    assert!(!stdout.contains("SocketException"));
}

#[test]
fn test_dataset_file_abort() {
    let (_, stderr, success) = run_reporttable(&[
        &fixture("errors.json"),
        "-t",
        "errors",
        "--on-format-error",
        "abort",
    ]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("formatting failed"));
}

#[test]
fn test_dataset_file_without_table_is_identity() {
    let (stdout, _, success) = run_reporttable(&[&fixture("errors.json"), "--format", "csv"]);

    assert!(success);
    assert!(stdout.contains("500/Internal Server Error,2000,19.619383951343927,2.7213106431708577"));
}

#[test]
fn test_scan_reports() {
    let (stdout, _, success) = run_reporttable(&["scan", &fixture("reports"), "--format", "csv"]);

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Reports");
    assert_eq!(lines[1], "Report,Samples,Failures,Error %,APDEX,Throughput");
    assert!(lines[2].starts_with("Total (2 reports),74494,10194,"));
    assert!(lines[3].starts_with("nightly,73494,10194,13.87%,0.861,250.01"));
    assert!(lines[4].starts_with("smoke,1000,0,0.00%,1.000,16.67"));
}

#[test]
fn test_scan_filter_and_exclude() {
    let (stdout, _, success) =
        run_reporttable(&["scan", &fixture("reports"), "--filter", "smo", "--format", "csv"]);

    assert!(success);
    assert!(stdout.contains("smoke,"));
    assert!(!stdout.contains("nightly,"));

    let (stdout, _, success) = run_reporttable(&[
        "scan",
        &fixture("reports"),
        "--exclude",
        "**/nightly/**",
        "--format",
        "csv",
    ]);

    assert!(success);
    assert!(stdout.contains("Total (1 reports)"));
    assert!(!stdout.contains("nightly"));
}

#[test]
fn test_scan_ignores_config_series_filter() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("reporttable.toml");
    std::fs::write(&config, "[display]\nseries_filter = \"API\"\n").unwrap();

    let (stdout, _, success) = run_reporttable(&[
        "scan",
        &fixture("reports"),
        "--format",
        "csv",
        "--config",
        &config.to_string_lossy(),
    ]);

    assert!(success);
    assert!(stdout.contains("Total (2 reports)"));
    assert!(stdout.contains("nightly,73494"));
    assert!(stdout.contains("smoke,1000"));
}

#[test]
fn test_scan_text_output() {
    let (stdout, _, success) = run_reporttable(&["scan", &fixture("reports")]);

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Reports");
    assert!(lines[2].starts_with("Report"));
    assert!(lines[3].chars().all(|c| c == '-'));
    assert!(lines[4].starts_with("Total (2 reports)"));
    assert!(lines[5].starts_with("nightly"));
    assert!(lines[6].starts_with("smoke"));
}

#[test]
fn test_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("reporttable.toml");
    std::fs::write(
        &config,
        "[display]\nseries_filter = \"get\"\n\n[output]\nformat = \"csv\"\n",
    )
    .unwrap();

    let (stdout, _, success) = run_reporttable(&[
        &fixture("reports/nightly"),
        "-t",
        "statistics",
        "--config",
        &config.to_string_lossy(),
    ]);

    assert!(success);
    assert!(stdout.contains("01- Get API,"));
    assert!(!stdout.contains("05- Delete API"));

    // Flags win over the config file
    let (stdout, _, success) = run_reporttable(&[
        &fixture("reports/nightly"),
        "-t",
        "statistics",
        "--filter",
        "delete",
        "--config",
        &config.to_string_lossy(),
    ]);

    assert!(success);
    assert!(stdout.contains("05- Delete API,"));
}

#[test]
fn test_invalid_filter_pattern() {
    let (_, stderr, success) =
        run_reporttable(&[&fixture("reports/nightly"), "--filter", "(unclosed"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("invalid filter pattern"));
}

#[test]
fn test_nonexistent_path() {
    let (_, stderr, success) = run_reporttable(&["/nonexistent/report/dir"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("path does not exist"));
}
