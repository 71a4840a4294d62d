//! Sync state persistence
//!
//! The state file sits next to the artifact (`<stem>.sync.json`) and records
//! what the last run did and which database it ran against. It is advisory
//! for drift detection but authoritative for the database identity check.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{ErrorKind, Read};

use chrono::{DateTime, Utc};
use datadict_fs::{NormalizedPath, io};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::model::DocumentPayload;
use crate::{Error, Result};

/// State file schema version.
pub const STATE_FORMAT_VERSION: u32 = 1;

fn default_format_version() -> u32 {
    STATE_FORMAT_VERSION
}

/// Record of the last completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStateRecord {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    pub last_sync: DateTime<Utc>,
    /// Database the document was generated from.
    pub database: Identity,
    pub tables_count: usize,
    /// All tables in the document, in display order.
    pub tables: Vec<String>,
    /// Tables merged by the run that wrote this record.
    #[serde(default)]
    pub updated_tables: Vec<String>,
    /// When each documented table was last merged.
    #[serde(default)]
    pub table_synced_at: BTreeMap<String, DateTime<Utc>>,
    /// Checksum of the artifact bytes as written by that run.
    #[serde(default)]
    pub artifact_checksum: Option<String>,
}

impl SyncStateRecord {
    /// Describe a run that produced `payload`.
    pub fn new(
        database: Identity,
        payload: &DocumentPayload,
        updated_tables: Vec<String>,
        artifact_checksum: Option<String>,
        last_sync: DateTime<Utc>,
    ) -> Self {
        let table_synced_at = updated_tables
            .iter()
            .filter(|name| payload.contains(name))
            .map(|name| (name.clone(), last_sync))
            .collect();
        Self {
            format_version: STATE_FORMAT_VERSION,
            last_sync,
            database,
            tables_count: payload.len(),
            tables: payload.order().to_vec(),
            updated_tables,
            table_synced_at,
            artifact_checksum,
        }
    }

    /// Keep `prior`'s timestamps for tables this run did not touch. Entries
    /// for tables no longer in the document are dropped.
    pub fn carry_over(mut self, prior: Option<&SyncStateRecord>) -> Self {
        let Some(prior) = prior else {
            return self;
        };
        for name in &self.tables {
            if !self.table_synced_at.contains_key(name)
                && let Some(at) = prior.table_synced_at.get(name)
            {
                self.table_synced_at.insert(name.clone(), *at);
            }
        }
        self
    }

    /// Load the state file with a shared lock.
    ///
    /// Returns `Ok(None)` when there is no state file. A file that exists but
    /// does not parse, or whose counts disagree, is `CorruptState`.
    pub fn load(path: &NormalizedPath) -> Result<Option<Self>> {
        let native_path = path.to_native();
        let file = match File::open(&native_path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(datadict_fs::Error::io(&native_path, e).into()),
        };
        FileExt::lock_shared(&file).map_err(|_| datadict_fs::Error::LockFailed {
            path: native_path.clone(),
        })?;

        // Read through the locked handle
        let mut content = String::new();
        (&file)
            .read_to_string(&mut content)
            .map_err(|e| datadict_fs::Error::io(&native_path, e))?;
        FileExt::unlock(&file).map_err(|_| datadict_fs::Error::LockFailed {
            path: native_path.clone(),
        })?;

        let corrupt = |reason: String| Error::CorruptState {
            path: native_path.clone(),
            reason,
        };

        let record: SyncStateRecord =
            serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;

        if record.format_version != STATE_FORMAT_VERSION {
            return Err(corrupt(format!(
                "unsupported state format version {}",
                record.format_version
            )));
        }
        if record.tables_count != record.tables.len() {
            return Err(corrupt(format!(
                "tables_count is {} but {} tables are listed",
                record.tables_count,
                record.tables.len()
            )));
        }

        Ok(Some(record))
    }

    /// Write the state file atomically.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        io::write_text(path, &content)?;
        tracing::debug!(path = %path, tables = self.tables_count, "saved sync state");
        Ok(())
    }
}

/// State file location for an artifact: `<stem>.sync.json` in the same
/// directory.
pub fn state_path_for(artifact: &NormalizedPath) -> NormalizedPath {
    let stem = artifact.file_stem().unwrap_or("datadict");
    artifact.with_file_name(&format!("{}.sync.json", stem))
}
