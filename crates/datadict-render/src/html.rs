//! Static HTML output under `<base>_html/`
//!
//! Small documents are a single `index.html`. Once the table count exceeds
//! the split threshold, tables go to `part1.html`, `part2.html`, ... and
//! `index.html` becomes a table of contents linking to every part.

use std::fmt::Write as _;

use datadict_core::{DocumentPayload, TableMetadata};
use datadict_fs::io;

use crate::cells::{HEADERS, column_cells};
use crate::{RenderTarget, Rendered, Result};

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
table{border-collapse:collapse;margin-bottom:2em}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left}\
th{background:#f0f0f0}";

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        title = escape_html(title),
    )
}

fn table_section(out: &mut String, table: &TableMetadata) {
    let _ = writeln!(out, "<h2 id=\"{0}\">{0}</h2>", escape_html(&table.name));
    if !table.comment.is_empty() {
        let _ = writeln!(out, "<p>{}</p>", escape_html(&table.comment));
    }
    out.push_str("<table>\n<tr>");
    for header in HEADERS {
        let _ = write!(out, "<th>{}</th>", header);
    }
    out.push_str("</tr>\n");
    for column in &table.columns {
        out.push_str("<tr>");
        for cell in column_cells(column) {
            let _ = write!(out, "<td>{}</td>", escape_html(&cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

/// A page documenting `tables`, with an optional link back to the index.
pub fn tables_page(database: &str, tables: &[&TableMetadata], back_link: bool) -> String {
    let mut body = String::new();
    if back_link {
        body.push_str("<p><a href=\"index.html\">Back to index</a></p>\n");
    }
    let _ = writeln!(body, "<h1>Data dictionary: {}</h1>", escape_html(database));
    for table in tables {
        table_section(&mut body, table);
    }
    page(&format!("Data dictionary: {}", database), &body)
}

/// Table of contents for a split document. `parts` pairs each file name
/// with the tables it holds.
pub fn index_page(database: &str, parts: &[(String, Vec<&TableMetadata>)]) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>Data dictionary: {}</h1>", escape_html(database));
    for (file, tables) in parts {
        let _ = writeln!(body, "<h2><a href=\"{0}\">{0}</a></h2>\n<ul>", escape_html(file));
        for table in tables {
            let _ = writeln!(
                body,
                "<li><a href=\"{}#{}\">{}</a></li>",
                escape_html(file),
                escape_html(&table.name),
                escape_html(&table.name)
            );
        }
        body.push_str("</ul>\n");
    }
    page(&format!("Data dictionary: {}", database), &body)
}

pub(crate) fn write(payload: &DocumentPayload, target: &RenderTarget) -> Result<Rendered> {
    let mut rendered = Rendered::default();
    let directory = target.path(&format!("{}_html", target.base_name));
    let tables: Vec<&TableMetadata> = payload.tables().collect();

    if tables.len() <= target.max_tables_per_file {
        let path = directory.join("index.html");
        io::write_text(&path, &tables_page(payload.database(), &tables, false))?;
        rendered.files.push(path);
        return Ok(rendered);
    }

    let parts: Vec<(String, Vec<&TableMetadata>)> = tables
        .chunks(target.max_tables_per_file)
        .enumerate()
        .map(|(i, chunk)| (format!("part{}.html", i + 1), chunk.to_vec()))
        .collect();

    for (file, chunk) in &parts {
        let path = directory.join(file);
        io::write_text(&path, &tables_page(payload.database(), chunk, true))?;
        rendered.files.push(path);
    }
    let index = directory.join("index.html");
    io::write_text(&index, &index_page(payload.database(), &parts))?;
    rendered.files.push(index);

    tracing::debug!(parts = parts.len(), "split html document");
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datadict_core::ColumnMetadata;

    #[test]
    fn test_cells_are_escaped() {
        let table = TableMetadata::new("t<1>")
            .with_comment("a & b")
            .with_column(ColumnMetadata::new("c", "text").with_default("'<x>'"));
        let html = tables_page("db", &[&table], false);
        assert!(html.contains("<h2 id=\"t&lt;1&gt;\">t&lt;1&gt;</h2>"));
        assert!(html.contains("<p>a &amp; b</p>"));
        assert!(html.contains("<td>&#039;&lt;x&gt;&#039;</td>"));
        assert!(!html.contains("Back to index"));
    }

    #[test]
    fn test_index_links_parts() {
        let a = TableMetadata::new("a");
        let b = TableMetadata::new("b");
        let parts = vec![
            ("part1.html".to_string(), vec![&a]),
            ("part2.html".to_string(), vec![&b]),
        ];
        let html = index_page("db", &parts);
        assert!(html.contains("<a href=\"part1.html#a\">a</a>"));
        assert!(html.contains("<a href=\"part2.html#b\">b</a>"));
    }
}
