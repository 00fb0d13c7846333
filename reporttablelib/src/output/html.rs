//! HTML sink: render a table as a `<table>` fragment.
//!
//! The markup mirrors the dashboard pages: grouping header rows carry the
//! `tablesorter-no-sort` class, the overall row sits in its own pinned
//! `<tbody>`, and body rows follow in default sort order.

use super::table::RenderedTable;

/// Render a table as an HTML fragment.
pub fn render_html_table(table: &RenderedTable, id: &str) -> String {
    let mut html = String::new();

    html.push_str(&format!("<table id=\"{}\" class=\"table\">\n", html_escape(id)));
    if let Some(title) = &table.title {
        html.push_str(&format!("  <caption>{}</caption>\n", html_escape(title)));
    }

    html.push_str("  <thead>\n");
    for group_row in &table.header_groups {
        html.push_str("    <tr class=\"tablesorter-no-sort\">");
        for group in group_row {
            html.push_str(&format!(
                "<th data-sorter=\"false\" colspan=\"{}\">{}</th>",
                group.span,
                html_escape(&group.label)
            ));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("    <tr>");
    for header in &table.headers {
        html.push_str(&format!("<th>{}</th>", html_escape(header)));
    }
    html.push_str("</tr>\n  </thead>\n");

    if let Some(overall) = &table.overall {
        html.push_str("  <tbody class=\"tablesorter-no-sort\">\n");
        html.push_str(&render_row(&overall.texts()));
        html.push_str("  </tbody>\n");
    }

    html.push_str("  <tbody>\n");
    for row in table.sorted_rows() {
        html.push_str(&render_row(&row.texts()));
    }
    html.push_str("  </tbody>\n</table>\n");

    html
}

fn render_row(cells: &[&str]) -> String {
    let mut row = String::from("    <tr>");
    for cell in cells {
        row.push_str(&format!("<td>{}</td>", html_escape(cell)));
    }
    row.push_str("</tr>\n");
    row
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
