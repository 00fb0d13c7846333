//! # reporttablelib
//!
//! Render the tabular data of load-test HTML dashboards: filterable,
//! sortable tables with per-column formatting.
//!
//! ## Overview
//!
//! A generated dashboard embeds each of its tables as a JSON dataset: a list
//! of column titles, an optional overall (totals) row and item rows. This
//! library turns such a dataset into a [`RenderedTable`]:
//!
//! - **Selection**: rows are kept or dropped by a case-insensitive regex
//!   series filter and a "controllers only" toggle
//! - **Formatting**: each cell goes through a per-table formatter; failures
//!   fall back to the raw value (or a placeholder, or skip the row, or abort)
//! - **Header decoration**: tables may add grouping rows above the titles
//! - **Sorting**: rows carry their raw values and a default sort order; the
//!   overall row is kept apart and never sorted
//!
//! ## Pipeline
//!
//! - [`source`]: find dashboards and extract their datasets
//! - [`data`]: values, rows, datasets and reports
//! - [`query`]: render options, sort order and row selection
//! - [`format`]: number and duration formatters
//! - [`render`]: the table renderer
//! - [`tables`]: configuration of the standard dashboard tables
//! - [`output`]: rendered tables and the HTML sink
//!
//! ## Example
//!
//! ```rust
//! use reporttablelib::{
//!     render_table, ColumnFormat, ColumnFormats, Dataset, RenderOptions, Row, SortKey,
//!     SortSpec, TableConfig, Value,
//! };
//!
//! let dataset = Dataset::new(["Label", "Error %"])
//!     .with_controllers_discrimination(true)
//!     .with_overall(Row::new(vec!["Total".into(), Value::from(2.5)]))
//!     .with_item(Row::new(vec!["GET /users".into(), Value::from(1.25)]))
//!     .with_item(Row::new(vec!["POST /users".into(), Value::from(7.0)]));
//!
//! let config = TableConfig::new()
//!     .formatter(ColumnFormats::new().column(1, ColumnFormat::Percent(2)))
//!     .sort(SortSpec::by(SortKey::descending(1)));
//!
//! let options = RenderOptions::new().filter("users");
//! let table = render_table(&dataset, &config, &options).unwrap();
//!
//! assert_eq!(table.overall.as_ref().unwrap().texts(), ["Total", "2.50%"]);
//! assert_eq!(table.sorted_rows()[0].texts(), ["POST /users", "7.00%"]);
//! ```

pub mod data;
pub mod error;
pub mod format;
pub mod output;
pub mod query;
pub mod render;
pub mod source;
pub mod tables;

pub use data::{number_text, Dataset, Report, ReportOverview, RequestsSummary, Row, TableKind, Value};
pub use error::ReportTableError;
pub use format::{CellFormatter, ColumnFormat, ColumnFormats, FormatError};
pub use output::{render_html_table, CellWarning, HeaderGroup, HeaderRow, RenderedRow, RenderedTable};
pub use query::{FormatFallback, RenderOptions, SortDirection, SortKey, SortSpec};
pub use render::{render_table, HeaderDecorator, TableConfig, TableRenderer, PLACEHOLDER};
pub use source::{discover_dashboards, load_dataset, load_report, FilterConfig};
pub use tables::{render_report, render_report_table, table_config};

/// Result type for reporttablelib operations
pub type Result<T> = std::result::Result<T, ReportTableError>;
