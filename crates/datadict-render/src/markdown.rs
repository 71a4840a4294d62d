//! Markdown output: a single `<base>.md`

use std::fmt::Write as _;

use datadict_core::DocumentPayload;
use datadict_fs::io;

use crate::cells::{HEADERS, column_cells};
use crate::{RenderTarget, Rendered, Result};

/// Past this many tables the single file gets hard to navigate.
pub const LARGE_DOCUMENT_TABLES: usize = 100;

/// Escape a value for a Markdown table cell.
pub fn escape_cell(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}

/// Build the Markdown document.
pub fn to_markdown(payload: &DocumentPayload) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Data dictionary: {}\n", escape_cell(payload.database()));

    for table in payload.tables() {
        let _ = writeln!(out, "## {}\n", escape_cell(&table.name));
        if !table.comment.is_empty() {
            let _ = writeln!(out, "{}\n", escape_cell(&table.comment));
        }
        let _ = writeln!(out, "| {} |", HEADERS.join(" | "));
        let _ = writeln!(out, "|{}", "---|".repeat(HEADERS.len()));
        for column in &table.columns {
            let cells: Vec<String> = column_cells(column).iter().map(|c| escape_cell(c)).collect();
            let _ = writeln!(out, "| {} |", cells.join(" | "));
        }
        out.push('\n');
    }
    out
}

pub(crate) fn write(payload: &DocumentPayload, target: &RenderTarget) -> Result<Rendered> {
    let mut rendered = Rendered::default();
    if payload.len() > LARGE_DOCUMENT_TABLES {
        rendered.warn(format!(
            "{} tables in one Markdown file; consider the excel or html format",
            payload.len()
        ));
    }

    let path = target.path(&format!("{}.md", target.base_name));
    io::write_text(&path, &to_markdown(payload))?;
    rendered.files.push(path);
    Ok(rendered)
}
