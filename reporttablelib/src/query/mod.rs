//! Query processing: select rows and declare sort order.
//!
//! This module handles the options side of rendering. It provides:
//!
//! - **Options**: display preferences (`RenderOptions`) and sort order (`SortSpec`)
//! - **Selection**: the per-row inclusion predicate (`RowSelection`)
//!
//! ## Example
//!
//! ```rust
//! use reporttablelib::query::{RenderOptions, RowSelection};
//! use reporttablelib::{Dataset, Row, Value};
//!
//! let dataset = Dataset::new(["Label", "Count"])
//!     .with_controllers_discrimination(true)
//!     .with_item(Row::new(vec!["GET".into(), Value::from(100.0)]))
//!     .with_item(Row::new(vec!["POST".into(), Value::from(50.0)]));
//!
//! let options = RenderOptions::new().filter("get");
//! let selection = RowSelection::new(&dataset, &options, 0).unwrap();
//! assert_eq!(selection.select(&dataset), vec![0]);
//! ```

pub mod options;
pub mod selection;

pub use options::{FormatFallback, RenderOptions, SortDirection, SortKey, SortSpec};
pub use selection::{RowSelection, SeriesFilter};
