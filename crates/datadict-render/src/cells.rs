//! Cell values shared by the tabular formats

use datadict_core::{ColumnMetadata, TableMetadata};

/// Column header row.
pub const HEADERS: [&str; 5] = ["Column", "Type", "Nullable", "Default", "Comment"];

/// Label of the leading table-comment row in CSV and Excel output.
pub const TABLE_COMMENT_LABEL: &str = "Table comment";

/// Display values for one column: nullability as `YES`/`NO`, a missing
/// default as `NULL`, a missing comment as empty.
pub fn column_cells(column: &ColumnMetadata) -> [String; 5] {
    [
        column.name.clone(),
        column.data_type.clone(),
        if column.nullable { "YES" } else { "NO" }.to_string(),
        column.default.clone().unwrap_or_else(|| "NULL".to_string()),
        column.comment.clone().unwrap_or_default(),
    ]
}

/// Rows of a per-table sheet: an optional comment row and blank separator,
/// then one row per column. Headers are not included.
pub fn table_rows(table: &TableMetadata) -> Vec<[String; 5]> {
    let mut rows = Vec::with_capacity(table.columns.len() + 2);
    if !table.comment.is_empty() {
        rows.push([
            TABLE_COMMENT_LABEL.to_string(),
            String::new(),
            String::new(),
            String::new(),
            table.comment.clone(),
        ]);
        rows.push(Default::default());
    }
    rows.extend(table.columns.iter().map(column_cells));
    rows
}

/// File-system safe name for a table.
pub fn file_stem(table: &str) -> String {
    let stem: String = table
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    match stem.as_str() {
        "" | "." | ".." => format!("_{}", stem),
        _ => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_cells_placeholders() {
        let column = ColumnMetadata::new("id", "int").not_null();
        assert_eq!(column_cells(&column), ["id", "int", "NO", "NULL", ""]);
    }

    #[test]
    fn test_table_rows_with_comment() {
        let table = TableMetadata::new("t")
            .with_comment("things")
            .with_column(ColumnMetadata::new("a", "text").with_default("'x'"));
        let rows = table_rows(&table);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][4], "things");
        assert_eq!(rows[1], <[String; 5]>::default());
        assert_eq!(rows[2], ["a", "text", "YES", "'x'", ""]);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("public/users"), "public_users");
        assert_eq!(file_stem(".."), "_..");
        assert_eq!(file_stem("orders"), "orders");
    }
}
