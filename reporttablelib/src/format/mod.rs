//! Cell formatting: turn raw values into display text per column.
//!
//! A table's formatter maps a column index and a raw [`Value`] to the text
//! shown in the cell. Formatters are pluggable through [`CellFormatter`];
//! closures work directly, and [`ColumnFormats`] covers the common case of
//! a fixed mapping from column to number format.
//!
//! ## Example
//!
//! ```rust
//! use reporttablelib::format::{CellFormatter, ColumnFormat, ColumnFormats};
//! use reporttablelib::Value;
//!
//! let formats = ColumnFormats::new()
//!     .column(0, ColumnFormat::Fixed(3))
//!     .columns([1, 2], ColumnFormat::Duration);
//!
//! assert_eq!(formats.format(0, &Value::from(0.8586)).unwrap(), "0.859");
//! assert_eq!(formats.format(1, &Value::from(500.0)).unwrap(), "500 ms");
//! assert_eq!(formats.format(3, &Value::from("Total")).unwrap(), "Total");
//! ```

pub mod number;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::data::value::Value;

pub use number::{format_duration, to_fixed};

/// A formatter could not handle a value.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("column {column}: cannot format {value:?}: {reason}")]
pub struct FormatError {
    pub column: usize,
    pub value: Value,
    pub reason: String,
}

impl FormatError {
    pub fn new(column: usize, value: &Value, reason: impl Into<String>) -> Self {
        Self {
            column,
            value: value.clone(),
            reason: reason.into(),
        }
    }
}

/// Per-table cell formatting callback.
pub trait CellFormatter {
    /// Display text for `value` in `column`.
    fn format(&self, column: usize, value: &Value) -> Result<String, FormatError>;
}

impl<F> CellFormatter for F
where
    F: Fn(usize, &Value) -> Result<String, FormatError>,
{
    fn format(&self, column: usize, value: &Value) -> Result<String, FormatError> {
        self(column, value)
    }
}

/// Named transform applied to one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnFormat {
    /// Value shown as-is
    Raw,
    /// Fixed number of fractional digits
    Fixed(usize),
    /// Fixed digits followed by `%`
    Percent(usize),
    /// Milliseconds as `N sec N ms`
    Duration,
}

impl ColumnFormat {
    /// Apply the format to a value.
    ///
    /// Empty text passes through every format untouched (padding cells in
    /// the top-errors table). Other text under a numeric format fails.
    pub fn apply(&self, column: usize, value: &Value) -> Result<String, FormatError> {
        if matches!(value, Value::Text(s) if s.is_empty()) {
            return Ok(String::new());
        }
        match self {
            ColumnFormat::Raw => Ok(value.text()),
            ColumnFormat::Fixed(digits) => numeric(column, value).map(|n| to_fixed(n, *digits)),
            ColumnFormat::Percent(digits) => {
                numeric(column, value).map(|n| format!("{}%", to_fixed(n, *digits)))
            }
            ColumnFormat::Duration => numeric(column, value).map(format_duration),
        }
    }
}

fn numeric(column: usize, value: &Value) -> Result<f64, FormatError> {
    value
        .as_f64()
        .ok_or_else(|| FormatError::new(column, value, "expected a number"))
}

/// Ordered mapping from column index to format; unmapped columns are raw.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnFormats {
    formats: BTreeMap<usize, ColumnFormat>,
}

impl ColumnFormats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the format of one column
    pub fn column(mut self, column: usize, format: ColumnFormat) -> Self {
        self.formats.insert(column, format);
        self
    }

    /// Builder: set the same format on several columns
    pub fn columns(mut self, columns: impl IntoIterator<Item = usize>, format: ColumnFormat) -> Self {
        for column in columns {
            self.formats.insert(column, format);
        }
        self
    }

    /// Format configured for a column.
    pub fn get(&self, column: usize) -> ColumnFormat {
        self.formats.get(&column).copied().unwrap_or(ColumnFormat::Raw)
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl CellFormatter for ColumnFormats {
    fn format(&self, column: usize, value: &Value) -> Result<String, FormatError> {
        self.get(column).apply(column, value)
    }
}
