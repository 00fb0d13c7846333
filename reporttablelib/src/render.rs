//! Table rendering: turn a dataset into a rendered table.
//!
//! Rendering is a single pass over the dataset:
//!
//! 1. The header decorator (if any) emits grouping header rows
//! 2. Titles become the header row, unmodified
//! 3. The overall row is formatted and pinned, never filtered
//! 4. Item rows pass through `RowSelection`, then each cell through the formatter
//! 5. The table's sort spec is attached as the default display order
//!
//! Shape problems and bad filter patterns are reported before any row is
//! produced. Formatter failures follow `RenderOptions::format_fallback`.

use tracing::{debug, warn};

use crate::data::dataset::{Dataset, Row};
use crate::error::ReportTableError;
use crate::format::CellFormatter;
use crate::output::table::{
    CellWarning, HeaderRow, RenderedCell, RenderedRow, RenderedTable, RowRef,
};
use crate::query::options::{FormatFallback, RenderOptions, SortSpec};
use crate::query::selection::RowSelection;
use crate::Result;

/// Text shown for a cell whose formatter failed under `FormatFallback::Placeholder`.
pub const PLACEHOLDER: &str = "-";

/// Per-table hook that can add grouping header rows above the titles.
pub trait HeaderDecorator {
    fn decorate(&self, titles: &[String], header: &mut Vec<HeaderRow>);
}

impl<F> HeaderDecorator for F
where
    F: Fn(&[String], &mut Vec<HeaderRow>),
{
    fn decorate(&self, titles: &[String], header: &mut Vec<HeaderRow>) {
        self(titles, header)
    }
}

/// Per-table rendering configuration.
///
/// Absent callbacks mean identity formatting and no extra header rows.
#[derive(Default)]
pub struct TableConfig {
    /// Cell formatter, applied to overall and body cells
    pub formatter: Option<Box<dyn CellFormatter>>,
    /// Default sort order of the body
    pub sort: SortSpec,
    /// Column tested by the series filter
    pub series_column: usize,
    /// Grouping header rows
    pub header_decorator: Option<Box<dyn HeaderDecorator>>,
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the cell formatter
    pub fn formatter(mut self, formatter: impl CellFormatter + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// Builder: set the default sort order
    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Builder: set the series column
    pub fn series_column(mut self, column: usize) -> Self {
        self.series_column = column;
        self
    }

    /// Builder: set the header decorator
    pub fn header_decorator(mut self, decorator: impl HeaderDecorator + 'static) -> Self {
        self.header_decorator = Some(Box::new(decorator));
        self
    }
}

/// Renders datasets under one set of display options.
#[derive(Debug, Clone, Default)]
pub struct TableRenderer {
    options: RenderOptions,
}

impl TableRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render one dataset.
    pub fn render(&self, dataset: &Dataset, config: &TableConfig) -> Result<RenderedTable> {
        render_table(dataset, config, &self.options)
    }
}

/// Render `dataset` with `config` under `options`.
pub fn render_table(
    dataset: &Dataset,
    config: &TableConfig,
    options: &RenderOptions,
) -> Result<RenderedTable> {
    dataset.validate()?;
    check_columns(dataset, config)?;
    let selection = RowSelection::new(dataset, options, config.series_column)?;

    let mut header_groups = Vec::new();
    if let Some(decorator) = &config.header_decorator {
        decorator.decorate(&dataset.titles, &mut header_groups);
    }

    let mut warnings = Vec::new();
    let formatter = config.formatter.as_deref();

    let overall = match &dataset.overall {
        Some(row) => format_row(
            row,
            RowRef::Overall,
            formatter,
            options.format_fallback,
            &mut warnings,
        )?,
        None => None,
    };

    let selected = selection.select(dataset);
    let mut rows = Vec::with_capacity(selected.len());
    for index in selected {
        if let Some(row) = format_row(
            &dataset.items[index],
            RowRef::Item(index),
            formatter,
            options.format_fallback,
            &mut warnings,
        )? {
            rows.push(row);
        }
    }

    debug!(
        items = dataset.items.len(),
        rendered = rows.len(),
        warnings = warnings.len(),
        "rendered table"
    );

    Ok(RenderedTable {
        title: None,
        header_groups,
        headers: dataset.titles.clone(),
        overall,
        rows,
        sort: config.sort.clone(),
        warnings,
    })
}

fn check_columns(dataset: &Dataset, config: &TableConfig) -> Result<()> {
    let columns = dataset.column_count();
    if config.series_column >= columns {
        return Err(ReportTableError::Configuration(format!(
            "series column {} is outside the {} titles",
            config.series_column, columns
        )));
    }
    if let Some(key) = config.sort.keys().iter().find(|k| k.column >= columns) {
        return Err(ReportTableError::Configuration(format!(
            "sort column {} is outside the {} titles",
            key.column, columns
        )));
    }
    Ok(())
}

/// Format every cell of a row. `Ok(None)` means the row was dropped by
/// `FormatFallback::SkipRow`.
fn format_row(
    row: &Row,
    row_ref: RowRef,
    formatter: Option<&dyn CellFormatter>,
    fallback: FormatFallback,
    warnings: &mut Vec<CellWarning>,
) -> Result<Option<RenderedRow>> {
    let mut cells = Vec::with_capacity(row.data.len());

    for (column, value) in row.data.iter().enumerate() {
        let text = match formatter.map(|f| f.format(column, value)) {
            None => value.text(),
            Some(Ok(text)) => text,
            Some(Err(err)) => {
                if fallback == FormatFallback::Abort {
                    return Err(err.into());
                }
                warn!(row = ?row_ref, column, error = %err, "cell formatting failed");
                warnings.push(CellWarning {
                    row: row_ref,
                    column,
                    message: err.to_string(),
                });
                match fallback {
                    FormatFallback::SkipRow => return Ok(None),
                    FormatFallback::Placeholder => PLACEHOLDER.to_string(),
                    _ => value.text(),
                }
            }
        };
        cells.push(RenderedCell {
            raw: value.clone(),
            text,
        });
    }

    Ok(Some(RenderedRow {
        source_index: match row_ref {
            RowRef::Overall => None,
            RowRef::Item(index) => Some(index),
        },
        is_controller: row.is_controller,
        cells,
    }))
}
