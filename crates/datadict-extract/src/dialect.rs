//! Per-dialect catalog queries
//!
//! Each dialect answers the same three questions: which tables exist, does a
//! given table exist (and what is its comment), and what are its columns in
//! ordinal order. Identifier-typed catalog columns are cast to text so they
//! decode as `String` on every server version.

use datadict_core::{ColumnMetadata, TableMetadata};
use sqlx::{MySqlPool, PgPool, Row, SqlitePool};

use crate::{Error, Result};

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub mod postgres {
    use super::*;

    /// Schema used when the configuration names none.
    pub const DEFAULT_SCHEMA: &str = "public";

    const LIST_TABLES: &str = r#"
        SELECT c.relname::text AS table_name
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE n.nspname = $1 AND c.relkind IN ('r', 'p')
        ORDER BY c.relname
    "#;

    const TABLE_COMMENT: &str = r#"
        SELECT obj_description(c.oid, 'pg_class') AS table_comment
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE n.nspname = $1 AND c.relname = $2 AND c.relkind IN ('r', 'p', 'v', 'm', 'f')
    "#;

    const COLUMNS: &str = r#"
        SELECT
            a.attname::text AS column_name,
            format_type(a.atttypid, a.atttypmod) AS data_type,
            NOT a.attnotnull AS nullable,
            pg_get_expr(d.adbin, d.adrelid) AS column_default,
            col_description(a.attrelid, a.attnum) AS column_comment
        FROM pg_attribute a
        JOIN pg_class c ON c.oid = a.attrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        LEFT JOIN pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum
        WHERE n.nspname = $1 AND c.relname = $2 AND a.attnum > 0 AND NOT a.attisdropped
        ORDER BY a.attnum
    "#;

    pub async fn list_tables(pool: &PgPool, schema: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(LIST_TABLES)
            .bind(schema)
            .fetch_all(pool)
            .await
            .map_err(Error::query("listing tables"))?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("table_name"))
            .collect::<std::result::Result<_, _>>()
            .map_err(Error::query("listing tables"))
    }

    pub async fn extract(pool: &PgPool, schema: &str, table: &str) -> Result<Option<TableMetadata>> {
        let context = format!("table {}.{}", schema, table);

        let Some(row) = sqlx::query(TABLE_COMMENT)
            .bind(schema)
            .bind(table)
            .fetch_optional(pool)
            .await
            .map_err(Error::query(context.clone()))?
        else {
            return Ok(None);
        };
        let comment: Option<String> = row
            .try_get("table_comment")
            .map_err(Error::query(context.clone()))?;

        let rows = sqlx::query(COLUMNS)
            .bind(schema)
            .bind(table)
            .fetch_all(pool)
            .await
            .map_err(Error::query(context.clone()))?;

        let mut metadata = TableMetadata::new(table).with_comment(comment.unwrap_or_default());
        for row in rows {
            let decode = |row: &sqlx::postgres::PgRow| -> std::result::Result<ColumnMetadata, sqlx::Error> {
                Ok(ColumnMetadata {
                    name: row.try_get("column_name")?,
                    data_type: row.try_get("data_type")?,
                    nullable: row.try_get("nullable")?,
                    default: row.try_get("column_default")?,
                    comment: non_empty(row.try_get("column_comment")?),
                })
            };
            metadata
                .columns
                .push(decode(&row).map_err(Error::query(context.clone()))?);
        }
        Ok(Some(metadata))
    }
}

pub mod mysql {
    use super::*;

    // A NULL schema falls back to the connection's database.
    const LIST_TABLES: &str = r#"
        SELECT CAST(TABLE_NAME AS CHAR) AS table_name
        FROM information_schema.TABLES
        WHERE TABLE_SCHEMA = COALESCE(?, DATABASE()) AND TABLE_TYPE = 'BASE TABLE'
        ORDER BY TABLE_NAME
    "#;

    const TABLE_COMMENT: &str = r#"
        SELECT CAST(TABLE_COMMENT AS CHAR) AS table_comment
        FROM information_schema.TABLES
        WHERE TABLE_SCHEMA = COALESCE(?, DATABASE()) AND TABLE_NAME = ?
    "#;

    const COLUMNS: &str = r#"
        SELECT
            CAST(COLUMN_NAME AS CHAR) AS column_name,
            CAST(COLUMN_TYPE AS CHAR) AS data_type,
            CAST(IS_NULLABLE AS CHAR) AS is_nullable,
            CAST(COLUMN_DEFAULT AS CHAR) AS column_default,
            CAST(COLUMN_COMMENT AS CHAR) AS column_comment
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = COALESCE(?, DATABASE()) AND TABLE_NAME = ?
        ORDER BY ORDINAL_POSITION
    "#;

    pub async fn list_tables(pool: &MySqlPool, schema: Option<&str>) -> Result<Vec<String>> {
        let rows = sqlx::query(LIST_TABLES)
            .bind(schema)
            .fetch_all(pool)
            .await
            .map_err(Error::query("listing tables"))?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("table_name"))
            .collect::<std::result::Result<_, _>>()
            .map_err(Error::query("listing tables"))
    }

    pub async fn extract(
        pool: &MySqlPool,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Option<TableMetadata>> {
        let context = format!("table {}", table);

        let Some(row) = sqlx::query(TABLE_COMMENT)
            .bind(schema)
            .bind(table)
            .fetch_optional(pool)
            .await
            .map_err(Error::query(context.clone()))?
        else {
            return Ok(None);
        };
        let comment: Option<String> = row
            .try_get("table_comment")
            .map_err(Error::query(context.clone()))?;

        let rows = sqlx::query(COLUMNS)
            .bind(schema)
            .bind(table)
            .fetch_all(pool)
            .await
            .map_err(Error::query(context.clone()))?;

        let mut metadata = TableMetadata::new(table).with_comment(comment.unwrap_or_default());
        for row in rows {
            let decode = |row: &sqlx::mysql::MySqlRow| -> std::result::Result<ColumnMetadata, sqlx::Error> {
                let is_nullable: String = row.try_get("is_nullable")?;
                Ok(ColumnMetadata {
                    name: row.try_get("column_name")?,
                    data_type: row.try_get("data_type")?,
                    nullable: is_nullable.eq_ignore_ascii_case("YES"),
                    default: row.try_get("column_default")?,
                    comment: non_empty(row.try_get("column_comment")?),
                })
            };
            metadata
                .columns
                .push(decode(&row).map_err(Error::query(context.clone()))?);
        }
        Ok(Some(metadata))
    }
}

pub mod sqlite {
    use super::*;

    const LIST_TABLES: &str = r#"
        SELECT name FROM sqlite_master
        WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
        ORDER BY name
    "#;

    const TABLE_EXISTS: &str = r#"
        SELECT name FROM sqlite_master
        WHERE type IN ('table', 'view') AND name = ?1
    "#;

    const COLUMNS: &str = r#"
        SELECT
            name,
            CAST(type AS TEXT) AS data_type,
            "notnull" AS not_null,
            CAST(dflt_value AS TEXT) AS column_default,
            pk
        FROM pragma_table_info(?1)
        ORDER BY cid
    "#;

    pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<String>> {
        let rows = sqlx::query(LIST_TABLES)
            .fetch_all(pool)
            .await
            .map_err(Error::query("listing tables"))?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("name"))
            .collect::<std::result::Result<_, _>>()
            .map_err(Error::query("listing tables"))
    }

    /// SQLite has no comments; table and column comments are always empty.
    pub async fn extract(pool: &SqlitePool, table: &str) -> Result<Option<TableMetadata>> {
        let context = format!("table {}", table);

        let exists = sqlx::query(TABLE_EXISTS)
            .bind(table)
            .fetch_optional(pool)
            .await
            .map_err(Error::query(context.clone()))?;
        if exists.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query(COLUMNS)
            .bind(table)
            .fetch_all(pool)
            .await
            .map_err(Error::query(context.clone()))?;

        let mut metadata = TableMetadata::new(table);
        for row in rows {
            let decode = |row: &sqlx::sqlite::SqliteRow| -> std::result::Result<ColumnMetadata, sqlx::Error> {
                let not_null: i64 = row.try_get("not_null")?;
                let pk: i64 = row.try_get("pk")?;
                Ok(ColumnMetadata {
                    name: row.try_get("name")?,
                    data_type: row.try_get("data_type")?,
                    // primary key columns are documented as NOT NULL
                    nullable: not_null == 0 && pk == 0,
                    default: row.try_get("column_default")?,
                    comment: None,
                })
            };
            metadata
                .columns
                .push(decode(&row).map_err(Error::query(context.clone()))?);
        }
        Ok(Some(metadata))
    }
}
