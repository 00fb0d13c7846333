//! Table-ready data structures for rendered report tables.
//!
//! This module provides `RenderedTable`, a presentation-ready structure that
//! sinks (terminal, CSV, HTML, JSON) consume directly.
//!
//! The data flow is:
//! 1. Dataset (raw values, as embedded in the dashboard)
//! 2. RowSelection (filter and controllers toggle applied)
//! 3. RenderedTable (formatted cells plus default sort order)
//!
//! Rows stay in data order. `sorted_rows()` applies the default sort for
//! display, so consumers can always re-sort from the original order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::data::value::Value;
use crate::query::options::{SortDirection, SortSpec};

/// A grouping header cell spanning several title columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderGroup {
    pub label: String,
    pub span: usize,
}

impl HeaderGroup {
    pub fn new(label: impl Into<String>, span: usize) -> Self {
        Self {
            label: label.into(),
            span,
        }
    }
}

/// One row of grouping header cells.
pub type HeaderRow = Vec<HeaderGroup>;

/// A rendered cell: the raw value and its display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedCell {
    pub raw: Value,
    pub text: String,
}

/// A rendered row (overall or body).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedRow {
    /// Index in `Dataset::items`; `None` for the overall row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_index: Option<usize>,
    pub is_controller: bool,
    pub cells: Vec<RenderedCell>,
}

impl RenderedRow {
    /// Display texts of the cells.
    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }

    /// Raw value of a column, if present.
    pub fn raw(&self, column: usize) -> Option<&Value> {
        self.cells.get(column).map(|c| &c.raw)
    }
}

/// Which row a warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowRef {
    Overall,
    Item(usize),
}

/// A recovered formatting failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellWarning {
    pub row: RowRef,
    pub column: usize,
    pub message: String,
}

/// Table-ready data.
///
/// This is the final data structure before presentation. Sinks iterate
/// over header groups, headers, overall row and sorted body rows - no
/// filtering or formatting left to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedTable {
    /// Optional title (e.g., "Statistics")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Grouping header rows emitted before the titles
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub header_groups: Vec<HeaderRow>,
    /// Column titles, unmodified
    pub headers: Vec<String>,
    /// Pinned summary row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall: Option<RenderedRow>,
    /// Body rows, in data order
    pub rows: Vec<RenderedRow>,
    /// Default sort order for display
    pub sort: SortSpec,
    /// Formatting failures recovered while rendering
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CellWarning>,
}

impl RenderedTable {
    /// Builder: set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Number of title columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Body rows in default sort order.
    ///
    /// Stable: rows that compare equal on every key keep data order.
    pub fn sorted_rows(&self) -> Vec<&RenderedRow> {
        let mut rows: Vec<&RenderedRow> = self.rows.iter().collect();
        if self.sort.is_empty() {
            return rows;
        }
        rows.sort_by(|a, b| compare_rows(a, b, &self.sort));
        rows
    }
}

fn compare_rows(a: &RenderedRow, b: &RenderedRow, sort: &SortSpec) -> Ordering {
    for key in sort.keys() {
        let ordering = match (a.raw(key.column), b.raw(key.column)) {
            (Some(x), Some(y)) => x.sort_cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let ordering = match key.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
