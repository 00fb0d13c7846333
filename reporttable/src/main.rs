//! # reporttable
//!
//! A CLI tool for reading the tables of load-test HTML dashboards in the
//! terminal.
//!
//! ## Overview
//!
//! reporttable is built on top of reporttablelib. It extracts the datasets a
//! generated dashboard embeds (APDEX, statistics, errors, top errors by
//! sampler) and renders them with the dashboard's own formatting, filtering
//! and default sort order.
//!
//! ## Features
//!
//! - **Series filter**: case-insensitive regex over sampler labels
//! - **Controllers only**: hide sample rows in tables that tell them apart
//! - **Sorting**: override the default order with `--sort 1:desc`
//! - **Multiple output formats**: Text (default), JSON via `--output json`,
//!   CSV and HTML via `--format`
//! - **Report scan**: summarize every report under a directory
//!
//! ## Usage
//!
//! ```bash
//! # Render every table of a report
//! reporttable path/to/report
//!
//! # Only statistics rows whose label matches "api"
//! reporttable show path/to/report --table statistics --filter api
//!
//! # Render a single dataset stored as JSON
//! reporttable show table.json --format csv
//!
//! # Summarize all reports under a directory
//! reporttable scan reports/ --exclude "**/old/**"
//! ```

mod config;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use outstanding::cli::{App, CommandContext, HandlerResult, Output, RunResult};
use outstanding::OutputMode;
use reporttablelib::source::{load_dataset, load_report, report_name};
use reporttablelib::{
    discover_dashboards, render_html_table, render_report, render_table, ColumnFormat,
    ColumnFormats, Dataset, FilterConfig, FormatFallback, RenderOptions, RenderedTable, Report,
    ReportOverview, Row, SortKey, SortSpec, TableConfig, TableKind, Value,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use config::{load_config, Config, OutputFormat, DEFAULT_LABEL_WIDTH};
use render::{create_theme, format_summary, render_csv_table, ReportView, REPORT_TABLE_TEMPLATE};

/// Arguments shared by the root command and `show`
fn show_args() -> Vec<Arg> {
    vec![
        Arg::new("path")
            .help("Report directory, dashboard.js or dataset JSON file")
            .default_value("."),
        Arg::new("table")
            .short('t')
            .long("table")
            .action(ArgAction::Append)
            .value_parser(["apdex", "statistics", "errors", "top-errors"])
            .help("Only render this table (can be specified multiple times)"),
        Arg::new("filter")
            .short('f')
            .long("filter")
            .help("Case-insensitive regex matched against the series column"),
        Arg::new("controllers-only")
            .long("controllers-only")
            .action(ArgAction::SetTrue)
            .help("Only show controller rows"),
        Arg::new("filter-all-series")
            .long("filter-all-series")
            .action(ArgAction::SetTrue)
            .help("Apply the filter to tables that cannot tell controllers apart"),
        Arg::new("sort")
            .short('s')
            .long("sort")
            .help("Sort order, e.g. 1:desc or 0:asc,3:desc"),
        Arg::new("on-format-error")
            .long("on-format-error")
            .value_parser(["raw", "placeholder", "skip-row", "abort"])
            .help("What to do when a cell cannot be formatted"),
    ]
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("reporttable")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Render the tables of load-test HTML dashboards")
        .args(show_args())
        .arg(
            Arg::new("format")
                .long("format")
                .global(true)
                .value_parser(OutputFormat::NAMES)
                .help("Write text, json, csv or html without the terminal template"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to a TOML config file (default: ./reporttable.toml)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug)"),
        )
        .subcommand(
            Command::new("show")
                .about("Render the tables of one report (default command)")
                .args(show_args()),
        )
        .subcommand(
            Command::new("scan")
                .about("Summarize every report found under a directory")
                .arg(
                    Arg::new("path")
                        .help("Directory to search")
                        .default_value("."),
                )
                .arg(
                    Arg::new("include")
                        .short('i')
                        .long("include")
                        .action(ArgAction::Append)
                        .help("Include dashboards matching glob pattern"),
                )
                .arg(
                    Arg::new("exclude")
                        .short('e')
                        .long("exclude")
                        .action(ArgAction::Append)
                        .help("Exclude dashboards matching glob pattern"),
                )
                .arg(
                    Arg::new("filter")
                        .short('f')
                        .long("filter")
                        .help("Case-insensitive regex matched against report names"),
                )
                .arg(
                    Arg::new("sort")
                        .short('s')
                        .long("sort")
                        .help("Sort order, e.g. 1:desc"),
                ),
        )
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins over `-v`. Only the first call installs one.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

/// Logging and config shared by every handler.
fn setup(matches: &ArgMatches) -> Result<Config> {
    init_tracing(matches.get_count("verbose"));
    load_config(matches.get_one::<String>("config").map(Path::new))
}

/// Where rendered tables go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sink {
    /// `--output json`: outstanding serializes the tables itself
    Structured,
    /// The report table template
    Template { label_width: usize },
    /// Written by hand and passed through the template untouched
    Raw(OutputFormat),
}

impl Sink {
    /// `--output` decides first, then `--format`, then the config file.
    fn resolve(matches: &ArgMatches, ctx: &CommandContext, config: &Config) -> Result<Self> {
        if ctx.output_mode.is_structured() {
            return Ok(Sink::Structured);
        }
        let format = match matches.get_one::<String>("format") {
            Some(name) => name.parse::<OutputFormat>().map_err(|e| anyhow!(e))?,
            None if matches!(ctx.output_mode, OutputMode::Auto) => {
                config.output.format.unwrap_or_default()
            }
            None => OutputFormat::Text,
        };
        Ok(match format {
            OutputFormat::Text => Sink::Template {
                label_width: config.output.label_width.unwrap_or(DEFAULT_LABEL_WIDTH),
            },
            other => Sink::Raw(other),
        })
    }

    /// Key of a report table: the element id for HTML, else the table name.
    fn key(&self, kind: TableKind) -> String {
        match self {
            Sink::Raw(OutputFormat::Html) => kind.element_id().to_string(),
            _ => kind.name().to_string(),
        }
    }
}

/// Overlay command-line flags on `options`.
fn apply_flags(matches: &ArgMatches, mut options: RenderOptions) -> Result<RenderOptions> {
    if let Some(filter) = matches.get_one::<String>("filter") {
        options = options.filter(filter.clone());
    }
    if matches.get_flag("controllers-only") {
        options = options.controllers_only(true);
    }
    if matches.get_flag("filter-all-series") {
        options = options.filters_only_sample_series(false);
    }
    if let Some(policy) = matches.get_one::<String>("on-format-error") {
        let fallback = policy.parse::<FormatFallback>().map_err(|e| anyhow!(e))?;
        options = options.format_fallback(fallback);
    }
    Ok(options)
}

fn parse_sort(matches: &ArgMatches) -> Result<Option<SortSpec>> {
    matches
        .get_one::<String>("sort")
        .map(|s| {
            s.parse::<SortSpec>()
                .map_err(|e| anyhow!("Invalid --sort '{}': {}", s, e))
        })
        .transpose()
}

fn extract_tables(matches: &ArgMatches) -> Result<Vec<TableKind>> {
    matches
        .get_many::<String>("table")
        .map(|names| {
            names
                .map(|n| n.parse::<TableKind>().map_err(|e| anyhow!(e)))
                .collect()
        })
        .unwrap_or_else(|| Ok(Vec::new()))
}

/// Build filter config from matches
fn build_filter(matches: &ArgMatches) -> Result<FilterConfig> {
    let mut filter = FilterConfig::new();

    if let Some(includes) = matches.get_many::<String>("include") {
        for pattern in includes {
            filter = filter.include(pattern)?;
        }
    }

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        for pattern in excludes {
            filter = filter.exclude(pattern)?;
        }
    }

    Ok(filter)
}

fn is_json_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn tables_json(tables: &[(String, RenderedTable)]) -> Result<serde_json::Value> {
    let mut map = serde_json::Map::new();
    for (key, table) in tables {
        map.insert(key.clone(), serde_json::to_value(table)?);
    }
    Ok(serde_json::Value::Object(map))
}

/// Build the handler output for rendered tables.
fn emit_tables(
    tables: &[(String, RenderedTable)],
    sink: Sink,
    preamble: Option<String>,
) -> Result<serde_json::Value> {
    let view = match sink {
        Sink::Structured => return tables_json(tables),
        Sink::Template { label_width } => {
            ReportView::tables(preamble, tables.iter().map(|(_, t)| t), label_width)
        }
        Sink::Raw(format) => ReportView::raw(raw_output(tables, format)?),
    };
    Ok(serde_json::to_value(view)?)
}

fn raw_output(tables: &[(String, RenderedTable)], format: OutputFormat) -> Result<String> {
    let mut output = String::new();
    match format {
        OutputFormat::Json => {
            output.push_str(&serde_json::to_string_pretty(&tables_json(tables)?)?);
            output.push('\n');
        }
        OutputFormat::Html => {
            for (key, table) in tables {
                output.push_str(&render_html_table(table, key));
            }
        }
        OutputFormat::Csv | OutputFormat::Text => {
            for (i, (_, table)) in tables.iter().enumerate() {
                if i > 0 {
                    output.push('\n');
                }
                if let Some(title) = &table.title {
                    output.push_str(&format!("{}\n", title));
                }
                output.push_str(&render_csv_table(table));
            }
        }
    }
    Ok(output)
}

/// Handler for show command
fn show_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let config = setup(matches)?;
    let sink = Sink::resolve(matches, ctx, &config)?;
    let value = show_report(matches, &config, sink)?;
    Ok(Output::Render(value))
}

fn show_report(matches: &ArgMatches, config: &Config, sink: Sink) -> Result<serde_json::Value> {
    let path = PathBuf::from(
        matches
            .get_one::<String>("path")
            .map(|s| s.as_str())
            .unwrap_or("."),
    );
    let kinds = extract_tables(matches)?;
    let sort = parse_sort(matches)?;

    if is_json_file(&path) {
        let dataset = load_dataset(&path)?;
        let options = apply_flags(matches, config.display.apply(RenderOptions::default()))?;
        return show_dataset(&path, &dataset, &kinds, sort, &options, sink);
    }

    let report = load_report(&path)?;
    let options = apply_flags(matches, config.display.apply(report.defaults.clone()))?;
    info!(report = %report.name, tables = report.tables.len(), "loaded report");
    debug!(?options, "render options");

    let rendered = render_report(&report, &kinds, &options, sort.as_ref())?;
    if rendered.is_empty() {
        bail!(
            "Report '{}' has none of the requested tables",
            report.name
        );
    }

    let tables: Vec<(String, RenderedTable)> = rendered
        .into_iter()
        .map(|(kind, table)| (sink.key(kind), table))
        .collect();

    emit_tables(&tables, sink, report_preamble(&report))
}

fn report_preamble(report: &Report) -> Option<String> {
    let summary = report.summary.as_ref()?;
    Some(format!("{}\n{}", report.name, format_summary(summary)))
}

/// Render a standalone dataset. With exactly one `--table`, that table's
/// formatting is used; otherwise cells are shown as-is.
fn show_dataset(
    path: &Path,
    dataset: &Dataset,
    kinds: &[TableKind],
    sort: Option<SortSpec>,
    options: &RenderOptions,
    sink: Sink,
) -> Result<serde_json::Value> {
    let (mut table_config, title) = match kinds {
        [kind] => (reporttablelib::table_config(*kind), kind.title().to_string()),
        [] => (TableConfig::new(), report_name(path)),
        _ => bail!("A dataset file holds a single table; pass at most one --table"),
    };
    if let Some(sort) = sort {
        table_config.sort = sort;
    }

    let table = render_table(dataset, &table_config, options)?.with_title(title);
    let key = match kinds {
        [kind] => sink.key(*kind),
        _ => "table".to_string(),
    };
    emit_tables(&[(key, table)], sink, None)
}

/// Titles of the multi-report summary table.
const SCAN_TITLES: [&str; 6] = [
    "Report",
    "Samples",
    "Failures",
    "Error %",
    "APDEX",
    "Throughput",
];

fn optional_number(value: Option<f64>) -> Value {
    value.map(Value::from).unwrap_or_else(|| Value::from(""))
}

fn overview_row(overview: &ReportOverview) -> Row {
    Row::new(vec![
        Value::from(overview.name.as_str()),
        optional_number(overview.samples),
        optional_number(overview.failures),
        optional_number(overview.error_percent),
        optional_number(overview.apdex),
        optional_number(overview.throughput),
    ])
}

/// Aggregate row over every report: sums for counts and throughput,
/// error % recomputed from the sums, APDEX weighted by samples.
fn aggregate_row(overviews: &[ReportOverview]) -> Row {
    let samples: f64 = overviews.iter().filter_map(|o| o.samples).sum();
    let failures: f64 = overviews.iter().filter_map(|o| o.failures).sum();
    let throughput: f64 = overviews.iter().filter_map(|o| o.throughput).sum();

    let error_percent = (samples > 0.0).then(|| failures * 100.0 / samples);

    let (weighted, weight) = overviews
        .iter()
        .filter_map(|o| Some((o.apdex?, o.samples?)))
        .fold((0.0, 0.0), |(sum, total), (apdex, n)| (sum + apdex * n, total + n));
    let apdex = (weight > 0.0).then(|| weighted / weight);

    Row::new(vec![
        Value::from(format!("Total ({} reports)", overviews.len())),
        Value::from(samples),
        Value::from(failures),
        optional_number(error_percent),
        optional_number(apdex),
        Value::from(throughput),
    ])
}

fn scan_config() -> TableConfig {
    TableConfig::new()
        .formatter(
            ColumnFormats::new()
                .column(3, ColumnFormat::Percent(2))
                .column(4, ColumnFormat::Fixed(3))
                .column(5, ColumnFormat::Fixed(2)),
        )
        .sort(SortSpec::by(SortKey::ascending(0)))
        .series_column(0)
}

/// Handler for scan command
fn scan_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let config = setup(matches)?;
    let sink = Sink::resolve(matches, ctx, &config)?;
    let value = scan_reports(matches, &config, sink)?;
    Ok(Output::Render(value))
}

/// Options for the scan table. The `[display]` section describes sampler
/// rows, so only its format fallback carries over; `--filter` matches
/// report names.
fn scan_options(matches: &ArgMatches, config: &Config) -> RenderOptions {
    let mut options = RenderOptions::default().filters_only_sample_series(false);
    if let Some(fallback) = config.display.format_fallback {
        options = options.format_fallback(fallback);
    }
    if let Some(pattern) = matches.get_one::<String>("filter") {
        options = options.filter(pattern.clone());
    }
    options
}

fn scan_reports(matches: &ArgMatches, config: &Config, sink: Sink) -> Result<serde_json::Value> {
    let root = matches
        .get_one::<String>("path")
        .map(|s| s.as_str())
        .unwrap_or(".");
    let filter = build_filter(matches)?;

    let dashboards = discover_dashboards(root, &filter)?;
    if dashboards.is_empty() {
        bail!("No dashboards found under '{}'", root);
    }

    let mut overviews = Vec::new();
    for path in &dashboards {
        match load_report(path) {
            Ok(report) => overviews.push(report.overview()),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping report"),
        }
    }
    if overviews.is_empty() {
        bail!("None of the {} dashboards under '{}' could be read", dashboards.len(), root);
    }
    info!(reports = overviews.len(), "scanned reports");

    let dataset = overviews.iter().fold(
        Dataset::new(SCAN_TITLES).with_overall(aggregate_row(&overviews)),
        |dataset, overview| dataset.with_item(overview_row(overview)),
    );

    let options = scan_options(matches, config);
    let mut table_config = scan_config();
    if let Some(sort) = parse_sort(matches)? {
        table_config.sort = sort;
    }

    let table = render_table(&dataset, &table_config, &options)?.with_title("Reports");
    emit_tables(&[("reports".to_string(), table)], sink, None)
}

/// Map the `--output` value outstanding adds to the root command.
fn root_output_mode(matches: &ArgMatches) -> OutputMode {
    matches
        .get_one::<String>("_output_mode")
        .map(|s| match s.as_str() {
            "json" => OutputMode::Json,
            "text" => OutputMode::Text,
            "term-debug" => OutputMode::TermDebug,
            "term" => OutputMode::Term,
            _ => OutputMode::Auto,
        })
        .unwrap_or(OutputMode::Auto)
}

fn main() -> ExitCode {
    let cmd = build_command();
    let theme = create_theme();

    let result = App::builder()
        .theme(theme)
        .command("show", show_handler, REPORT_TABLE_TEMPLATE)
        .command("scan", scan_handler, REPORT_TABLE_TEMPLATE)
        .run_to_string(cmd, std::env::args());

    match result {
        RunResult::Handled(output) => {
            if !output.is_empty() {
                if output.starts_with("Error:") {
                    eprintln!("{}", output);
                    return ExitCode::FAILURE;
                }
                print!("{}", output);
            }
            ExitCode::SUCCESS
        }
        RunResult::Binary(_, _) => ExitCode::SUCCESS,
        RunResult::NoMatch(matches) => {
            // No subcommand: the root command runs show
            let output_mode = root_output_mode(&matches);
            let ctx = CommandContext {
                output_mode,
                command_path: vec![],
            };

            match show_handler(&matches, &ctx) {
                Ok(Output::Render(value)) => {
                    if output_mode.is_structured() {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&value).unwrap_or_default()
                        );
                    } else {
                        match outstanding::render(REPORT_TABLE_TEMPLATE, &value, &create_theme()) {
                            Ok(output) => print!("{}", output),
                            Err(e) => {
                                eprintln!("Error: {e}");
                                return ExitCode::FAILURE;
                            }
                        }
                    }
                    ExitCode::SUCCESS
                }
                Ok(Output::Silent) => ExitCode::SUCCESS,
                Ok(Output::Binary { .. }) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {e:#}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
