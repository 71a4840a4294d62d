//! CSV output: one file per table under `<base>_csvs/`

use csv::WriterBuilder;
use datadict_core::{DocumentPayload, TableMetadata};
use datadict_fs::io;

use crate::cells::{HEADERS, file_stem, table_rows};
use crate::{Error, RenderTarget, Rendered, Result};

/// Serialize one table. A table comment comes first as its own row, followed
/// by a blank row, then the column header and rows.
pub fn table_csv(table: &TableMetadata) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    let rows = table_rows(table);
    let (leading, columns) = rows.split_at(rows.len() - table.columns.len());

    for row in leading {
        writer
            .write_record(row)
            .map_err(|err| Error::Csv(err.to_string()))?;
    }
    writer
        .write_record(HEADERS)
        .map_err(|err| Error::Csv(err.to_string()))?;
    for row in columns {
        writer
            .write_record(row)
            .map_err(|err| Error::Csv(err.to_string()))?;
    }

    writer.into_inner().map_err(|err| Error::Csv(err.to_string()))
}

pub(crate) fn write(payload: &DocumentPayload, target: &RenderTarget) -> Result<Rendered> {
    let mut rendered = Rendered::default();
    let directory = target.path(&format!("{}_csvs", target.base_name));

    for table in payload.tables() {
        let path = directory.join(&format!("{}.csv", file_stem(&table.name)));
        if rendered.files.contains(&path) {
            rendered.warn(format!(
                "table '{}' maps to an existing file name {}; skipped",
                table.name, path
            ));
            continue;
        }
        io::write_atomic(&path, &table_csv(table)?)?;
        rendered.files.push(path);
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datadict_core::ColumnMetadata;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_csv_without_comment() {
        let table = TableMetadata::new("users")
            .with_column(ColumnMetadata::new("id", "int").not_null())
            .with_column(ColumnMetadata::new("note", "text").with_comment("free, text"));
        let csv = String::from_utf8(table_csv(&table).unwrap()).unwrap();
        assert_eq!(
            csv,
            "Column,Type,Nullable,Default,Comment\nid,int,NO,NULL,\nnote,text,YES,NULL,\"free, text\"\n"
        );
    }

    #[test]
    fn test_table_csv_with_comment() {
        let table = TableMetadata::new("users")
            .with_comment("people")
            .with_column(ColumnMetadata::new("id", "int"));
        let csv = String::from_utf8(table_csv(&table).unwrap()).unwrap();
        assert!(csv.starts_with("Table comment,,,,people\n,,,,\nColumn,"));
    }
}
