//! Document model
//!
//! A [`DocumentPayload`] is the complete, self-describing catalog embedded in
//! the interactive document. Tables are keyed by name and carry an explicit
//! display order; the order list and the table map always name the same set.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload schema version, matched by the envelope markers.
pub const PAYLOAD_FORMAT_VERSION: u32 = 1;

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    /// Type as rendered by the source database, e.g. `varchar(255)`.
    #[serde(rename = "type")]
    pub data_type: String,
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            default: None,
            comment: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Everything documented about one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub name: String,
    /// Table comment; empty when the database has none.
    #[serde(default)]
    pub comment: String,
    /// Columns in ordinal position.
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            columns: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_column(mut self, column: ColumnMetadata) -> Self {
        self.columns.push(column);
        self
    }
}

/// Whether an upsert added a table or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Added,
    Replaced,
}

/// Wire shape of the payload; validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawPayload {
    format_version: u32,
    database: String,
    generated_at: DateTime<Utc>,
    order: Vec<String>,
    tables: BTreeMap<String, TableMetadata>,
}

/// The ordered table catalog of one database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPayload", into = "RawPayload")]
pub struct DocumentPayload {
    database: String,
    generated_at: DateTime<Utc>,
    order: Vec<String>,
    tables: BTreeMap<String, TableMetadata>,
}

impl DocumentPayload {
    /// An empty payload for `database`, stamped now.
    pub fn new(database: impl Into<String>) -> Self {
        Self::new_at(database, Utc::now())
    }

    pub fn new_at(database: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        Self {
            database: database.into(),
            generated_at,
            order: Vec::new(),
            tables: BTreeMap::new(),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn set_database(&mut self, database: impl Into<String>) {
        self.database = database.into();
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn set_generated_at(&mut self, at: DateTime<Utc>) {
        self.generated_at = at;
    }

    /// Table names in display order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TableMetadata> {
        self.tables.get(name)
    }

    /// Tables in display order.
    pub fn tables(&self) -> impl Iterator<Item = &TableMetadata> {
        self.order.iter().filter_map(|name| self.tables.get(name))
    }

    /// Insert or replace a table, keyed by its name.
    ///
    /// A replaced table keeps its display position; a new one goes last.
    pub fn upsert(&mut self, table: TableMetadata) -> Upsert {
        let name = table.name.clone();
        match self.tables.insert(name.clone(), table) {
            Some(_) => Upsert::Replaced,
            None => {
                self.order.push(name);
                Upsert::Added
            }
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let mut seen = HashSet::with_capacity(self.order.len());
        for name in &self.order {
            if !seen.insert(name.as_str()) {
                return Err(format!("table '{}' appears twice in display order", name));
            }
            if !self.tables.contains_key(name) {
                return Err(format!("table '{}' is ordered but has no metadata", name));
            }
        }
        if let Some(orphan) = self.tables.keys().find(|name| !seen.contains(name.as_str())) {
            return Err(format!("table '{}' has metadata but no display position", orphan));
        }
        if let Some((key, table)) = self.tables.iter().find(|(key, table)| **key != table.name) {
            return Err(format!(
                "table stored under '{}' is named '{}'",
                key, table.name
            ));
        }
        Ok(())
    }
}

impl TryFrom<RawPayload> for DocumentPayload {
    type Error = String;

    fn try_from(raw: RawPayload) -> std::result::Result<Self, Self::Error> {
        if raw.format_version != PAYLOAD_FORMAT_VERSION {
            return Err(format!(
                "unsupported payload format version {} (expected {})",
                raw.format_version, PAYLOAD_FORMAT_VERSION
            ));
        }
        let payload = Self {
            database: raw.database,
            generated_at: raw.generated_at,
            order: raw.order,
            tables: raw.tables,
        };
        payload.validate()?;
        Ok(payload)
    }
}

impl From<DocumentPayload> for RawPayload {
    fn from(payload: DocumentPayload) -> Self {
        Self {
            format_version: PAYLOAD_FORMAT_VERSION,
            database: payload.database,
            generated_at: payload.generated_at,
            order: payload.order,
            tables: payload.tables,
        }
    }
}
