//! Excel output
//!
//! One worksheet per table. Worksheet names are limited to 31 characters and
//! may not contain `[ ] : * ? / \`, so table names are cleaned, truncated
//! and de-duplicated before use; each rename is reported as a warning.

use std::collections::HashSet;

use datadict_core::{DocumentPayload, TableMetadata};
use datadict_fs::io;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::cells::{HEADERS, table_rows};
use crate::{Error, RenderTarget, Rendered, Result};

pub const MAX_SHEET_NAME: usize = 31;

/// Prefix values Excel would evaluate as a formula.
pub fn sanitize_xlsx_value(value: &str) -> String {
    match value.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{}", value),
        _ => value.to_string(),
    }
}

/// A valid, unique worksheet name for `table`. Records the result in `used`.
pub fn sheet_name(table: &str, used: &mut HashSet<String>) -> String {
    let cleaned: String = table
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches('\'');
    let base: String = if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned.chars().take(MAX_SHEET_NAME).collect()
    };

    let mut candidate = base.clone();
    let mut n = 1;
    while used.contains(&candidate.to_lowercase()) {
        n += 1;
        let suffix = format!("_{}", n);
        let keep = MAX_SHEET_NAME - suffix.chars().count();
        candidate = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
    }
    used.insert(candidate.to_lowercase());
    candidate
}

fn write_row(sheet: &mut Worksheet, row: u32, values: &[String]) -> Result<()> {
    for (col, value) in values.iter().enumerate() {
        sheet
            .write_string(row, col as u16, sanitize_xlsx_value(value))
            .map_err(|err| Error::Xlsx(err.to_string()))?;
    }
    Ok(())
}

fn write_sheet(sheet: &mut Worksheet, table: &TableMetadata, bold: &Format) -> Result<()> {
    let rows = table_rows(table);
    let (leading, columns) = rows.split_at(rows.len() - table.columns.len());

    let mut row = 0u32;
    for values in leading {
        write_row(sheet, row, values)?;
        row += 1;
    }
    for (col, header) in HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(row, col as u16, *header, bold)
            .map_err(|err| Error::Xlsx(err.to_string()))?;
    }
    row += 1;
    for values in columns {
        write_row(sheet, row, values)?;
        row += 1;
    }
    Ok(())
}

/// Build a workbook for `tables` and return its bytes.
pub fn workbook(tables: &[&TableMetadata], rendered: &mut Rendered) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let mut used = HashSet::new();

    for table in tables {
        let name = sheet_name(&table.name, &mut used);
        if name != table.name {
            rendered.warn(format!(
                "table '{}' written to worksheet '{}'",
                table.name, name
            ));
        }
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&name)
            .map_err(|err| Error::Xlsx(err.to_string()))?;
        write_sheet(sheet, table, &bold)?;
    }

    workbook
        .save_to_buffer()
        .map_err(|err| Error::Xlsx(err.to_string()))
}

pub(crate) fn write(payload: &DocumentPayload, target: &RenderTarget) -> Result<Rendered> {
    let mut rendered = Rendered::default();
    let tables: Vec<&TableMetadata> = payload.tables().collect();

    if tables.len() <= target.max_tables_per_file {
        let path = target.path(&format!("{}.xlsx", target.base_name));
        let bytes = workbook(&tables, &mut rendered)?;
        io::write_atomic(&path, &bytes)?;
        rendered.files.push(path);
        return Ok(rendered);
    }

    for (i, chunk) in tables.chunks(target.max_tables_per_file).enumerate() {
        let path = target.path(&format!("{}_part{}.xlsx", target.base_name, i + 1));
        let bytes = workbook(chunk, &mut rendered)?;
        io::write_atomic(&path, &bytes)?;
        rendered.files.push(path);
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_formula_prefixes() {
        assert_eq!(sanitize_xlsx_value("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(sanitize_xlsx_value("-1"), "'-1");
        assert_eq!(sanitize_xlsx_value("plain"), "plain");
        assert_eq!(sanitize_xlsx_value(""), "");
    }

    #[test]
    fn test_sheet_name_cleans_and_truncates() {
        let mut used = HashSet::new();
        assert_eq!(sheet_name("a/b:c", &mut used), "a_b_c");
        let long = "x".repeat(40);
        assert_eq!(sheet_name(&long, &mut used), "x".repeat(31));
    }

    #[test]
    fn test_sheet_name_deduplicates_case_insensitively() {
        let mut used = HashSet::new();
        let long = "y".repeat(40);
        assert_eq!(sheet_name(&long, &mut used), "y".repeat(31));
        assert_eq!(sheet_name(&long, &mut used), format!("{}_2", "y".repeat(29)));
        assert_eq!(sheet_name("Users", &mut used), "Users");
        assert_eq!(sheet_name("users", &mut used), "users_2");
    }
}
