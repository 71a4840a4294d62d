//! Metadata extraction seam
//!
//! The engine never talks to a database directly. It asks a
//! [`MetadataExtractor`] for the table list and for one table at a time.

use std::collections::HashSet;
use std::error::Error as StdError;

use crate::model::TableMetadata;
use crate::sync::SkippedTable;

/// Error type of extractor implementations.
pub type ExtractError = Box<dyn StdError + Send + Sync>;

/// A source of table metadata.
pub trait MetadataExtractor {
    /// All table names the source can document, in its natural order.
    fn list_tables(&self) -> Result<Vec<String>, ExtractError>;

    /// Metadata for one table, or `Ok(None)` when the table does not exist.
    fn extract(&self, table: &str) -> Result<Option<TableMetadata>, ExtractError>;
}

/// Fixed set of tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryExtractor {
    tables: Vec<TableMetadata>,
    failing: HashSet<String>,
}

impl MemoryExtractor {
    pub fn new(tables: Vec<TableMetadata>) -> Self {
        Self {
            tables,
            failing: HashSet::new(),
        }
    }

    /// Add or replace a table.
    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.tables.retain(|t| t.name != table.name);
        self.tables.push(table);
        self
    }

    /// Make extraction of `table` fail with an error.
    pub fn failing_on(mut self, table: impl Into<String>) -> Self {
        self.failing.insert(table.into());
        self
    }
}

impl MetadataExtractor for MemoryExtractor {
    fn list_tables(&self) -> Result<Vec<String>, ExtractError> {
        Ok(self.tables.iter().map(|t| t.name.clone()).collect())
    }

    fn extract(&self, table: &str) -> Result<Option<TableMetadata>, ExtractError> {
        if self.failing.contains(table) {
            return Err(format!("simulated failure reading '{}'", table).into());
        }
        Ok(self.tables.iter().find(|t| t.name == table).cloned())
    }
}

/// Tables fetched for a run.
#[derive(Debug, Clone, Default)]
pub struct Fetched {
    /// Found tables, in request order, named as requested.
    pub tables: Vec<TableMetadata>,
    pub skipped: Vec<SkippedTable>,
}

/// Extract `names` one at a time. A failing table is recorded as skipped and
/// the remaining tables are still fetched; missing tables are left out.
pub fn fetch_tables(extractor: &dyn MetadataExtractor, names: &[String]) -> Fetched {
    let mut fetched = Fetched {
        tables: Vec::with_capacity(names.len()),
        skipped: Vec::new(),
    };

    for name in names {
        match extractor.extract(name) {
            Ok(Some(mut table)) => {
                if table.name != *name {
                    tracing::debug!(requested = %name, returned = %table.name, "renaming extracted table");
                    table.name = name.clone();
                }
                fetched.tables.push(table);
            }
            Ok(None) => tracing::debug!(table = %name, "table not found"),
            Err(e) => {
                tracing::warn!(table = %name, error = %e, "extraction failed, skipping table");
                fetched.skipped.push(SkippedTable {
                    table: name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    fetched
}

/// Include/exclude selection for full runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    /// Only these tables, when set.
    pub include: Option<Vec<String>>,
    pub exclude: Vec<String>,
}

impl TableFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn allows(&self, table: &str) -> bool {
        let included = self
            .include
            .as_ref()
            .is_none_or(|names| names.iter().any(|n| n == table));
        included && !self.exclude.iter().any(|n| n == table)
    }

    /// Apply to a listing, keeping its order.
    pub fn apply(&self, tables: Vec<String>) -> Vec<String> {
        tables.into_iter().filter(|t| self.allows(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_include_and_exclude() {
        let filter = TableFilter {
            include: Some(vec!["a".into(), "b".into()]),
            exclude: vec!["b".into()],
        };
        let tables = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(filter.apply(tables), vec!["a"]);
    }

    #[test]
    fn test_memory_extractor_lookup() {
        let extractor = MemoryExtractor::default()
            .with_table(TableMetadata::new("users"))
            .failing_on("broken");
        assert!(extractor.extract("users").unwrap().is_some());
        assert!(extractor.extract("ghost").unwrap().is_none());
        assert!(extractor.extract("broken").is_err());
    }

    #[test]
    fn test_fetch_tables_collects_failures() {
        let extractor = MemoryExtractor::default()
            .with_table(TableMetadata::new("users"))
            .failing_on("broken");
        let names = vec!["users".to_string(), "broken".to_string(), "ghost".to_string()];

        let fetched = fetch_tables(&extractor, &names);
        assert_eq!(fetched.tables, vec![TableMetadata::new("users")]);
        assert_eq!(fetched.skipped.len(), 1);
        assert_eq!(fetched.skipped[0].table, "broken");
    }
}
