//! Data model: values, rows, datasets and reports.
//!
//! This module holds the input side of the pipeline - the tabular data a
//! dashboard embeds. It provides:
//!
//! - **Value**: a string or number cell
//! - **Row / Dataset**: titles, optional overall row and item rows
//! - **Report**: the datasets extracted from one dashboard
//!
//! ## Example
//!
//! ```rust
//! use reporttablelib::data::{Dataset, Row, Value};
//!
//! let dataset = Dataset::new(["Label", "Count"])
//!     .with_item(Row::new(vec!["GET".into(), Value::from(100.0)]));
//! assert!(dataset.validate().is_ok());
//! ```

pub mod dataset;
pub mod report;
pub mod value;

pub use dataset::{Dataset, Row};
pub use report::{Report, ReportOverview, ReportTable, RequestsSummary, TableKind};
pub use value::{number_text, Value};
