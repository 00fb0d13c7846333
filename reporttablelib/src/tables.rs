//! Standard dashboard tables: formatters, sort orders and header groups.
//!
//! Each table a dashboard renders gets a fixed configuration:
//!
//! | Table       | Series column | Default sort | Formats                          |
//! |-------------|---------------|--------------|----------------------------------|
//! | APDEX       | 3             | 0 asc        | 0 fixed(3), 1-2 duration         |
//! | Statistics  | 0             | 0 asc        | 3 percent(2), 4 and 7-13 fixed(2)|
//! | Errors      | 0             | 1 desc       | 2-3 percent(2)                   |
//! | Top errors  | 0             | 0 asc        | none                             |

use tracing::debug;

use crate::data::report::{Report, TableKind};
use crate::format::{ColumnFormat, ColumnFormats};
use crate::output::table::{HeaderGroup, HeaderRow, RenderedTable};
use crate::query::options::{RenderOptions, SortKey, SortSpec};
use crate::render::{render_table, TableConfig};
use crate::Result;

/// Grouping header above the statistics table titles.
pub const STATISTICS_GROUPS: [(&str, usize); 5] = [
    ("Requests", 1),
    ("Executions", 3),
    ("Response Times (ms)", 7),
    ("Throughput", 1),
    ("Network (KB/sec)", 2),
];

/// Emit the statistics grouping header row.
pub fn statistics_header(titles: &[String], header: &mut Vec<HeaderRow>) {
    let span: usize = STATISTICS_GROUPS.iter().map(|(_, span)| span).sum();
    if span != titles.len() {
        debug!(
            titles = titles.len(),
            span, "statistics header groups do not cover every title"
        );
    }
    header.push(
        STATISTICS_GROUPS
            .iter()
            .map(|(label, span)| HeaderGroup::new(*label, *span))
            .collect(),
    );
}

/// Rendering configuration for a standard table.
pub fn table_config(kind: TableKind) -> TableConfig {
    match kind {
        TableKind::Apdex => TableConfig::new()
            .formatter(
                ColumnFormats::new()
                    .column(0, ColumnFormat::Fixed(3))
                    .columns([1, 2], ColumnFormat::Duration),
            )
            .sort(SortSpec::by(SortKey::ascending(0)))
            .series_column(3),
        TableKind::Statistics => TableConfig::new()
            .formatter(
                ColumnFormats::new()
                    .column(3, ColumnFormat::Percent(2))
                    .columns([4, 7, 8, 9, 10, 11, 12, 13], ColumnFormat::Fixed(2)),
            )
            .sort(SortSpec::by(SortKey::ascending(0)))
            .series_column(0)
            .header_decorator(statistics_header),
        TableKind::Errors => TableConfig::new()
            .formatter(ColumnFormats::new().columns([2, 3], ColumnFormat::Percent(2)))
            .sort(SortSpec::by(SortKey::descending(1))),
        TableKind::TopErrors => TableConfig::new()
            .sort(SortSpec::by(SortKey::ascending(0)))
            .series_column(0),
    }
}

/// Render one standard table of a report, if the report has it.
///
/// `sort` overrides the table's default sort order.
pub fn render_report_table(
    report: &Report,
    kind: TableKind,
    options: &RenderOptions,
    sort: Option<&SortSpec>,
) -> Result<Option<RenderedTable>> {
    let Some(dataset) = report.table(kind) else {
        return Ok(None);
    };
    let mut config = table_config(kind);
    if let Some(sort) = sort {
        config.sort = sort.clone();
    }
    let table = render_table(dataset, &config, options)?;
    Ok(Some(table.with_title(kind.title())))
}

/// Render the requested standard tables of a report, in dashboard order.
///
/// An empty `kinds` selects every table. Tables the report lacks are
/// skipped.
pub fn render_report(
    report: &Report,
    kinds: &[TableKind],
    options: &RenderOptions,
    sort: Option<&SortSpec>,
) -> Result<Vec<(TableKind, RenderedTable)>> {
    let mut tables = Vec::new();
    for kind in TableKind::ALL {
        if !kinds.is_empty() && !kinds.contains(&kind) {
            continue;
        }
        if let Some(table) = render_report_table(report, kind, options, sort)? {
            tables.push((kind, table));
        }
    }
    Ok(tables)
}
