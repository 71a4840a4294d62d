//! Report types for sync runs

use serde::Serialize;

use crate::guard::GuardOutcome;
use crate::identity::Identity;
use crate::state::SyncStateRecord;

/// Which kind of run produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Full,
    Incremental,
}

/// A table whose extraction failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTable {
    pub table: String,
    pub reason: String,
}

/// Outcome of a generate or sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub mode: RunMode,
    /// Nothing was written.
    pub dry_run: bool,
    pub guard: GuardOutcome,
    /// Tables merged by this run, in request order.
    pub updated: Vec<String>,
    /// Subset of `updated` that was new to the document.
    pub added: Vec<String>,
    /// Requested tables the database does not have.
    pub not_found: Vec<String>,
    /// Requested tables whose extraction failed.
    pub skipped: Vec<SkippedTable>,
    /// Tables in the resulting document.
    pub tables_count: usize,
    pub warnings: Vec<String>,
    pub artifact_path: String,
    pub state_path: String,
}

impl SyncReport {
    pub fn identity_verified(&self) -> bool {
        self.guard == GuardOutcome::Verified
    }

    /// Whether some requested table did not make it into the document.
    pub fn is_partial(&self) -> bool {
        !self.not_found.is_empty() || !self.skipped.is_empty()
    }
}

/// Read-only view of a document and its sync state.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub artifact_path: String,
    pub state_path: String,
    /// Identity the current configuration resolves to.
    pub configured: Identity,
    pub artifact_exists: bool,
    /// Number of tables in the document, when it could be read.
    pub artifact_tables: Option<usize>,
    pub artifact_error: Option<String>,
    pub state: Option<SyncStateRecord>,
    pub state_error: Option<String>,
    /// Whether the recorded identity matches the configuration. Without a
    /// state record only the database name inside the document is compared.
    pub identity_matches: Option<bool>,
    /// Whether the document changed since the state was written.
    pub artifact_modified: Option<bool>,
}

impl StatusReport {
    /// Whether a sync against the current configuration would proceed cleanly.
    pub fn is_healthy(&self) -> bool {
        self.artifact_error.is_none()
            && self.state_error.is_none()
            && self.identity_matches != Some(false)
            && self.artifact_modified != Some(true)
    }
}
