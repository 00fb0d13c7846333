//! Template rendering for CLI output using outstanding, plus the CSV sink.

use console::Style;
use outstanding::Theme;
use reporttablelib::format::to_fixed;
use reporttablelib::{RenderedRow, RenderedTable, RequestsSummary};
use serde::Serialize;

/// Include template at compile time
pub const REPORT_TABLE_TEMPLATE: &str = include_str!("../templates/report_table.jinja");

const COLUMN_GAP: &str = "  ";

/// One table, pre-formatted for the template
#[derive(Debug, Serialize)]
pub struct TableView {
    pub title: Option<String>,
    /// Grouping header lines, centered over their spans
    pub groups: Vec<String>,
    pub header: String,
    /// Separator line (dashes)
    pub separator: String,
    pub overall: Option<String>,
    /// Body rows in default sort order
    pub rows: Vec<String>,
}

/// Data context for the report table template
#[derive(Debug, Default, Serialize)]
pub struct ReportView {
    /// Output already written by the CSV, HTML or JSON sinks
    pub raw: Option<String>,
    /// Report name and pass/fail summary
    pub preamble: Option<String>,
    pub tables: Vec<TableView>,
}

impl ReportView {
    pub fn raw(text: String) -> Self {
        Self {
            raw: Some(text),
            ..Default::default()
        }
    }

    pub fn tables<'a>(
        preamble: Option<String>,
        tables: impl IntoIterator<Item = &'a RenderedTable>,
        label_width: usize,
    ) -> Self {
        Self {
            raw: None,
            preamble,
            tables: tables
                .into_iter()
                .map(|t| table_view(t, label_width))
                .collect(),
        }
    }
}

/// Create the theme with styles
pub fn create_theme() -> Theme {
    Theme::new().add("category", Style::new().bold())
}

/// Truncate a name to fit within max_len, adding ".." prefix if needed
fn truncate_name(name: &str, max_len: usize) -> String {
    let len = name.chars().count();
    if len > max_len && max_len > 2 {
        let tail: String = name.chars().skip(len - max_len + 2).collect();
        format!("..{}", tail)
    } else {
        name.to_string()
    }
}

fn width(text: &str) -> usize {
    text.chars().count()
}

/// Column widths: the label column is capped at `label_width`.
fn column_widths(table: &RenderedTable, label_width: usize) -> Vec<usize> {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| width(h)).collect();
    let rows = table.overall.iter().chain(table.rows.iter());
    for row in rows {
        for (i, cell) in row.cells.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(width(&cell.text));
            }
        }
    }
    if let Some(first) = widths.first_mut() {
        *first = (*first).min(label_width.max(4));
    }
    widths
}

fn format_line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let mut parts = Vec::with_capacity(widths.len());
    for (i, w) in widths.iter().enumerate() {
        let text = cells.get(i).map(|c| c.as_ref()).unwrap_or("");
        if i == 0 {
            parts.push(format!("{:<width$}", truncate_name(text, *w), width = w));
        } else {
            parts.push(format!("{:>width$}", text, width = w));
        }
    }
    parts.join(COLUMN_GAP).trim_end().to_string()
}

fn format_row(row: &RenderedRow, widths: &[usize]) -> String {
    format_line(&row.texts(), widths)
}

fn span_width(widths: &[usize]) -> usize {
    widths.iter().sum::<usize>() + COLUMN_GAP.len() * widths.len().saturating_sub(1)
}

/// Pre-format a table for the template.
///
/// Cells are padded here; the template only lays out lines and applies
/// the "category" style to the title, header and overall row.
pub fn table_view(table: &RenderedTable, label_width: usize) -> TableView {
    let widths = column_widths(table, label_width);

    let groups = table
        .header_groups
        .iter()
        .map(|group_row| {
            let mut parts = Vec::new();
            let mut column = 0;
            for group in group_row {
                let end = (column + group.span).min(widths.len());
                let spanned = span_width(&widths[column.min(end)..end]);
                parts.push(format!(
                    "{:^width$}",
                    truncate_name(&group.label, spanned),
                    width = spanned
                ));
                column = end;
            }
            parts.join(COLUMN_GAP).trim_end().to_string()
        })
        .collect();

    TableView {
        title: table.title.clone(),
        groups,
        header: format_line(&table.headers, &widths),
        separator: "-".repeat(span_width(&widths)),
        overall: table.overall.as_ref().map(|row| format_row(row, &widths)),
        rows: table
            .sorted_rows()
            .into_iter()
            .map(|row| format_row(row, &widths))
            .collect(),
    }
}

/// One-line pass/fail summary of a report.
pub fn format_summary(summary: &RequestsSummary) -> String {
    format!(
        "Requests: {}% passed, {}% failed",
        to_fixed(summary.ok_percent, 2),
        to_fixed(summary.ko_percent, 2)
    )
}

fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) || text.starts_with(' ') || text.ends_with(' ') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

fn csv_line<S: AsRef<str>>(cells: &[S]) -> String {
    let fields: Vec<String> = cells.iter().map(|c| csv_field(c.as_ref())).collect();
    format!("{}\n", fields.join(","))
}

/// Render a table as CSV: header, overall row, body rows in sorted order.
pub fn render_csv_table(table: &RenderedTable) -> String {
    let mut output = csv_line(&table.headers);
    if let Some(overall) = &table.overall {
        output.push_str(&csv_line(&overall.texts()));
    }
    for row in table.sorted_rows() {
        output.push_str(&csv_line(&row.texts()));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use reporttablelib::{
        render_table, ColumnFormat, ColumnFormats, Dataset, HeaderGroup, HeaderRow,
        RenderOptions, Row, SortKey, SortSpec, TableConfig, Value,
    };

    fn table() -> RenderedTable {
        let dataset = Dataset::new(["Label", "#Samples", "Error %"])
            .with_overall(Row::new(vec![
                "Total".into(),
                Value::from(300.0),
                Value::from(2.0),
            ]))
            .with_item(Row::new(vec![
                "GET /a".into(),
                Value::from(100.0),
                Value::from(1.0),
            ]))
            .with_item(Row::new(vec![
                "POST /b, bulk".into(),
                Value::from(200.0),
                Value::from(2.5),
            ]));
        let config = TableConfig::new()
            .formatter(ColumnFormats::new().column(2, ColumnFormat::Percent(2)))
            .sort(SortSpec::by(SortKey::descending(1)))
            .header_decorator(|_: &[String], header: &mut Vec<HeaderRow>| {
                header.push(vec![
                    HeaderGroup::new("Requests", 1),
                    HeaderGroup::new("Executions", 2),
                ]);
            });
        render_table(&dataset, &config, &RenderOptions::default())
            .unwrap()
            .with_title("Statistics")
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short", 10), "short");
        assert_eq!(truncate_name("a/very/long/label", 8), "../label");
        assert_eq!(truncate_name("ééééé", 4), "..éé");
    }

    #[test]
    fn test_table_view_layout() {
        let view = table_view(&table(), 40);

        assert_eq!(view.title.as_deref(), Some("Statistics"));
        assert_eq!(view.groups.len(), 1);
        assert!(view.groups[0].contains("Requests") && view.groups[0].contains("Executions"));
        assert!(view.header.starts_with("Label"));
        assert_eq!(view.separator.len(), view.header.len());
        assert!(view.separator.chars().all(|c| c == '-'));
        assert!(view.overall.as_deref().unwrap().starts_with("Total"));
        // Sorted by #Samples descending
        assert!(view.rows[0].starts_with("POST /b, bulk"));
        assert!(view.rows[0].ends_with("2.50%"));
        assert!(view.rows[1].starts_with("GET /a"));
    }

    #[test]
    fn test_table_view_label_width_truncates() {
        let view = table_view(&table(), 8);
        assert!(view.rows[0].starts_with(".., bulk"));
        assert!(view.rows.iter().all(|row| !row.contains("POST /b, bulk")));
    }

    #[test]
    fn test_template_renders_tables() {
        let view = ReportView::tables(Some("nightly".to_string()), [&table()], 40);
        let output =
            outstanding::render(REPORT_TABLE_TEMPLATE, &view, &create_theme()).unwrap();
        let plain = console::strip_ansi_codes(&output).to_string();
        let lines: Vec<&str> = plain.lines().collect();

        assert_eq!(lines[0], "nightly");
        assert_eq!(lines[2], "Statistics");
        assert!(lines[4].contains("Requests"));
        assert!(lines[5].starts_with("Label"));
        assert!(lines[6].chars().all(|c| c == '-'));
        assert!(lines[7].starts_with("Total"));
        assert!(lines[8].starts_with("POST /b, bulk"));
        assert!(lines[9].starts_with("GET /a"));
    }

    #[test]
    fn test_template_passes_raw_output_through() {
        let csv = render_csv_table(&table());
        let view = ReportView::raw(csv.clone());
        let output =
            outstanding::render(REPORT_TABLE_TEMPLATE, &view, &create_theme()).unwrap();
        assert_eq!(output.trim_end(), csv.trim_end());
    }

    #[test]
    fn test_csv_quoting_and_order() {
        let csv = render_csv_table(&table());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Label,#Samples,Error %");
        assert_eq!(lines[1], "Total,300,2.00%");
        assert_eq!(lines[2], "\"POST /b, bulk\",200,2.50%");
        assert_eq!(lines[3], "GET /a,100,1.00%");
    }

    #[test]
    fn test_summary_line() {
        let summary = RequestsSummary {
            ok_percent: 86.12947995754756,
            ko_percent: 13.870520042452446,
        };
        assert_eq!(format_summary(&summary), "Requests: 86.13% passed, 13.87% failed");
    }
}
