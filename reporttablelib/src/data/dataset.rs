//! Tabular dataset description consumed by the table renderer.
//!
//! The JSON shape matches the blobs that dashboards embed in their
//! `createTable(...)` calls:
//!
//! ```json
//! {
//!   "supportsControllersDiscrimination": true,
//!   "overall": {"data": ["Total", 150], "isController": false},
//!   "titles": ["Label", "Count"],
//!   "items": [{"data": ["GET", 100], "isController": false}]
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::value::Value;
use crate::error::ReportTableError;
use crate::Result;

/// One row of a dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// One value per title column
    #[serde(default)]
    pub data: Vec<Value>,
    /// Whether the row aggregates a controller (transaction) rather than a
    /// single sampler
    #[serde(default)]
    pub is_controller: bool,
}

impl Row {
    /// Create a sampler row.
    pub fn new(data: Vec<Value>) -> Self {
        Self {
            data,
            is_controller: false,
        }
    }

    /// Create a controller row.
    pub fn controller(data: Vec<Value>) -> Self {
        Self {
            data,
            is_controller: true,
        }
    }

    /// Value at a column, if present.
    pub fn get(&self, column: usize) -> Option<&Value> {
        self.data.get(column)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A table's worth of data: titles, an optional pinned overall row and the
/// item rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Column titles, in display order
    #[serde(default)]
    pub titles: Vec<String>,
    /// Summary row rendered above the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall: Option<Row>,
    /// Body rows, in data order
    #[serde(default)]
    pub items: Vec<Row>,
    /// Whether rows carry a meaningful `isController` flag
    #[serde(default)]
    pub supports_controllers_discrimination: bool,
}

impl Dataset {
    /// Create an empty dataset with the given titles.
    pub fn new<S: Into<String>>(titles: impl IntoIterator<Item = S>) -> Self {
        Self {
            titles: titles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Builder: set the overall row
    pub fn with_overall(mut self, row: Row) -> Self {
        self.overall = Some(row);
        self
    }

    /// Builder: append an item row
    pub fn with_item(mut self, row: Row) -> Self {
        self.items.push(row);
        self
    }

    /// Builder: mark whether controller rows can be told apart
    pub fn with_controllers_discrimination(mut self, supported: bool) -> Self {
        self.supports_controllers_discrimination = supported;
        self
    }

    /// Parse a dataset from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of title columns.
    pub fn column_count(&self) -> usize {
        self.titles.len()
    }

    /// Check the dataset shape.
    ///
    /// Titles must be present, and every non-empty item row must have one
    /// value per title. Empty rows are tolerated (the renderer skips them)
    /// and the overall row keeps its own layout.
    pub fn validate(&self) -> Result<()> {
        if self.titles.is_empty() {
            return Err(ReportTableError::Configuration(
                "dataset has no titles".to_string(),
            ));
        }

        for (index, row) in self.items.iter().enumerate() {
            if !row.is_empty() && row.data.len() != self.titles.len() {
                return Err(ReportTableError::Configuration(format!(
                    "item {} has {} values but there are {} titles",
                    index,
                    row.data.len(),
                    self.titles.len()
                )));
            }
        }

        Ok(())
    }
}
