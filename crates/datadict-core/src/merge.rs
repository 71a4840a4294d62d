//! Table-level merge
//!
//! Folds freshly extracted table records into a prior payload. Each requested
//! table that was fetched replaces its prior record wholesale (or is appended
//! if new); every other table is carried over untouched and keeps its display
//! position.

use std::collections::HashMap;

use crate::model::{DocumentPayload, TableMetadata, Upsert};

/// Result of a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub payload: DocumentPayload,
    /// Requested tables that were fetched and merged, in request order.
    pub updated: Vec<String>,
    /// Subset of `updated` that was not in the prior payload.
    pub added: Vec<String>,
    /// Requested tables with no fresh record.
    pub not_found: Vec<String>,
}

/// Merge `fresh` records for the `requested` tables into `prior`.
///
/// - A requested table with a fresh record is replaced in place, or appended
///   in request order when it is new.
/// - A requested table without a fresh record is reported as not found and
///   its prior record, if any, is kept as is.
/// - Fresh records for tables that were not requested are ignored.
/// - With no prior payload the result holds only the fetched tables.
///
/// The generation timestamp is carried over from the prior payload; the
/// caller stamps the result when it is actually written.
pub fn merge(
    prior: Option<DocumentPayload>,
    fresh: Vec<TableMetadata>,
    requested: &[String],
    database: &str,
) -> MergeOutcome {
    let mut payload = prior.unwrap_or_else(|| DocumentPayload::new(database));
    payload.set_database(database);

    let mut by_name: HashMap<String, TableMetadata> = HashMap::with_capacity(fresh.len());
    for table in fresh {
        if !requested.contains(&table.name) {
            tracing::debug!(table = %table.name, "ignoring unrequested fresh record");
            continue;
        }
        by_name.entry(table.name.clone()).or_insert(table);
    }

    let mut updated = Vec::new();
    let mut added = Vec::new();
    let mut not_found = Vec::new();

    for name in requested {
        if updated.contains(name) || not_found.contains(name) {
            continue;
        }
        match by_name.remove(name) {
            Some(table) => {
                if payload.upsert(table) == Upsert::Added {
                    added.push(name.clone());
                }
                updated.push(name.clone());
            }
            None => not_found.push(name.clone()),
        }
    }

    MergeOutcome {
        payload,
        updated,
        added,
        not_found,
    }
}
