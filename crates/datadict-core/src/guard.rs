//! Consistency guard
//!
//! Decides whether a run may touch an existing document. The sync state
//! records which database the document was built from; a run configured
//! against a different database is refused before anything is written. The
//! payload names its database too, which catches a foreign document even
//! when the state file is gone.

use datadict_fs::checksum::compute_checksum;
use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::model::DocumentPayload;
use crate::state::SyncStateRecord;
use crate::{Error, Result};

/// How far the target could be verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardOutcome {
    /// State record present and its identity matches.
    Verified,
    /// No state and no artifact: nothing to protect.
    FirstRun,
    /// An artifact exists but there is no usable state to check it against.
    Unverified,
}

/// Verdict plus the warnings a run should surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardReport {
    pub outcome: GuardOutcome,
    pub warnings: Vec<String>,
}

impl GuardReport {
    fn new(outcome: GuardOutcome) -> Self {
        Self {
            outcome,
            warnings: Vec::new(),
        }
    }

    fn warn(mut self, message: String) -> Self {
        tracing::warn!("{}", message);
        self.warnings.push(message);
        self
    }

    pub fn is_verified(&self) -> bool {
        self.outcome == GuardOutcome::Verified
    }
}

/// Checks the configured identity against the recorded one.
#[derive(Debug, Clone)]
pub struct ConsistencyGuard {
    identity: Identity,
}

impl ConsistencyGuard {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Check a run against the recorded state and the current artifact bytes.
    ///
    /// # Errors
    ///
    /// `DatabaseMismatch` when the state records a different identity. Every
    /// other irregularity is a warning.
    pub fn check(
        &self,
        state: Option<&SyncStateRecord>,
        artifact: Option<&[u8]>,
    ) -> Result<GuardReport> {
        let Some(state) = state else {
            return Ok(match artifact {
                None => GuardReport::new(GuardOutcome::FirstRun),
                Some(_) => GuardReport::new(GuardOutcome::Unverified).warn(
                    "document exists without a sync state record; its source database cannot be verified"
                        .to_string(),
                ),
            });
        };

        if state.database != self.identity {
            tracing::error!(
                expected = %state.database,
                actual = %self.identity,
                "refusing to merge into a document from another database"
            );
            return Err(Error::DatabaseMismatch {
                expected: Box::new(state.database.clone()),
                actual: Box::new(self.identity.clone()),
            });
        }

        let report = GuardReport::new(GuardOutcome::Verified);
        let Some(bytes) = artifact else {
            return Ok(report.warn(
                "sync state exists but the document is missing; rebuilding it from the requested tables"
                    .to_string(),
            ));
        };

        match &state.artifact_checksum {
            Some(recorded) if *recorded != compute_checksum(bytes) => Ok(report.warn(
                "document was modified since the last sync; manual edits to the payload will be kept, edits elsewhere will be lost"
                    .to_string(),
            )),
            _ => Ok(report),
        }
    }

    /// Check the database name recorded inside a decoded payload.
    ///
    /// # Errors
    ///
    /// `DatabaseMismatch` when the payload was built from another database.
    /// Only the name is recorded there, so the expected identity carries the
    /// name alone.
    pub fn check_payload(&self, payload: &DocumentPayload) -> Result<()> {
        if payload.database() == self.identity.name {
            return Ok(());
        }
        let recorded = Identity {
            name: payload.database().to_string(),
            host: String::new(),
            port: 0,
            user: String::new(),
        };
        tracing::error!(
            expected = %recorded,
            actual = %self.identity,
            "refusing to merge into a document that names another database"
        );
        Err(Error::DatabaseMismatch {
            expected: Box::new(recorded),
            actual: Box::new(self.identity.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn identity(host: &str) -> Identity {
        Identity {
            name: "shop".into(),
            host: host.into(),
            port: 3306,
            user: "reader".into(),
        }
    }

    fn state(host: &str, checksum: Option<String>) -> SyncStateRecord {
        SyncStateRecord::new(
            identity(host),
            &DocumentPayload::new("shop"),
            Vec::new(),
            checksum,
            Utc::now(),
        )
    }

    #[test]
    fn test_first_run() {
        let report = ConsistencyGuard::new(identity("db1")).check(None, None).unwrap();
        assert_eq!(report.outcome, GuardOutcome::FirstRun);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_artifact_without_state_is_unverified() {
        let report = ConsistencyGuard::new(identity("db1"))
            .check(None, Some(b"<html>".as_slice()))
            .unwrap();
        assert_eq!(report.outcome, GuardOutcome::Unverified);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_mismatch_is_an_error() {
        let guard = ConsistencyGuard::new(identity("db2"));
        let result = guard.check(Some(&state("db1", None)), Some(b"<html>".as_slice()));
        assert!(matches!(result, Err(Error::DatabaseMismatch { .. })));
    }

    #[test]
    fn test_checksum_drift_warns() {
        let state = state("db1", Some(compute_checksum(b"original")));
        let guard = ConsistencyGuard::new(identity("db1"));

        let clean = guard.check(Some(&state), Some(b"original".as_slice())).unwrap();
        assert!(clean.is_verified());
        assert!(clean.warnings.is_empty());

        let drifted = guard.check(Some(&state), Some(b"edited".as_slice())).unwrap();
        assert!(drifted.is_verified());
        assert_eq!(drifted.warnings.len(), 1);
    }

    #[test]
    fn test_state_without_artifact_warns() {
        let report = ConsistencyGuard::new(identity("db1"))
            .check(Some(&state("db1", None)), None)
            .unwrap();
        assert!(report.is_verified());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_payload_from_another_database_is_an_error() {
        let guard = ConsistencyGuard::new(identity("db1"));
        assert!(guard.check_payload(&DocumentPayload::new("shop")).is_ok());

        let err = guard.check_payload(&DocumentPayload::new("crm")).unwrap_err();
        match err {
            Error::DatabaseMismatch { expected, actual } => {
                assert_eq!(expected.name, "crm");
                assert_eq!(actual.name, "shop");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
