//! Output: present rendered tables.
//!
//! This module handles the final stage of the pipeline. It provides:
//!
//! - **RenderedTable**: table-ready structure with header groups, headers,
//!   overall row, body rows and default sort order
//! - **HTML sink**: a `<table>` fragment mirroring the dashboard markup
//!
//! RenderedTable is a pure presentation layer. Selection and formatting
//! happen in the renderer; terminal, CSV and JSON sinks live in the CLI.

pub mod html;
pub mod table;

pub use html::render_html_table;
pub use table::{
    CellWarning, HeaderGroup, HeaderRow, RenderedCell, RenderedRow, RenderedTable, RowRef,
};
