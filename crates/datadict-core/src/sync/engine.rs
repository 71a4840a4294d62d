//! SyncEngine implementation
//!
//! Every run follows the same sequence: load the sync state, run the guard,
//! read the prior payload, extract, merge, then write the artifact and the
//! state. Everything that can reject the run happens before extraction, and
//! nothing is written until the merged payload is complete.

use chrono::Utc;
use datadict_fs::checksum::{compute_checksum, compute_content_checksum};
use datadict_fs::{NormalizedPath, io};
use datadict_meta::{DatabaseConfig, OutputConfig};

use crate::artifact::{decode_artifact, render_artifact};
use crate::extract::{MetadataExtractor, TableFilter, fetch_tables};
use crate::guard::{ConsistencyGuard, GuardReport};
use crate::identity::Identity;
use crate::merge::merge;
use crate::model::DocumentPayload;
use crate::state::{SyncStateRecord, state_path_for};
use crate::{Error, Result};

use super::report::{RunMode, SkippedTable, StatusReport, SyncReport};

/// Options for generate and sync runs
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Compute the result and report it without writing anything.
    pub dry_run: bool,
}

/// Where an interactive document for this configuration lives:
/// `<directory>/<base>_interactive/index.html`.
pub fn interactive_artifact_path(output: &OutputConfig, database: &DatabaseConfig) -> NormalizedPath {
    NormalizedPath::new(&output.directory)
        .join(&format!("{}_interactive", output.base_name(database)))
        .join("index.html")
}

/// Everything a run needs besides the extractor.
#[derive(Debug, Clone)]
pub struct SyncContext {
    pub database: DatabaseConfig,
    pub artifact_path: NormalizedPath,
    pub state_path: NormalizedPath,
    pub options: SyncOptions,
}

impl SyncContext {
    /// Context for an explicit artifact path; the state file sits beside it.
    pub fn new(database: DatabaseConfig, artifact_path: NormalizedPath) -> Self {
        let state_path = state_path_for(&artifact_path);
        Self {
            database,
            artifact_path,
            state_path,
            options: SyncOptions::default(),
        }
    }

    /// Context for the configured output location.
    pub fn for_output(database: DatabaseConfig, output: &OutputConfig) -> Self {
        let artifact_path = interactive_artifact_path(output, &database);
        Self::new(database, artifact_path)
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }
}

/// What a run has established before extraction starts.
struct Preflight {
    state: Option<SyncStateRecord>,
    guard: GuardReport,
    prior: Option<DocumentPayload>,
    warnings: Vec<String>,
}

/// Engine for generating and incrementally syncing an interactive document
///
/// The SyncEngine provides three operations:
/// - **generate**: document every table the extractor lists
/// - **sync**: refresh a subset of tables inside the existing document
/// - **status**: report on the document and its state without writing
pub struct SyncEngine {
    context: SyncContext,
    guard: ConsistencyGuard,
}

impl SyncEngine {
    pub fn new(context: SyncContext) -> Self {
        let guard = ConsistencyGuard::new(Identity::of(&context.database));
        Self { context, guard }
    }

    pub fn context(&self) -> &SyncContext {
        &self.context
    }

    /// Identity of the configured database.
    pub fn identity(&self) -> &Identity {
        self.guard.identity()
    }

    /// Refresh `requested` tables in the document.
    ///
    /// Tables that are not requested are carried over unchanged. A requested
    /// table the database does not have keeps its prior record. Extraction
    /// failures are reported per table and never abort the run.
    ///
    /// # Errors
    ///
    /// - `NoTablesSpecified` when `requested` is empty
    /// - `DatabaseMismatch` when the document belongs to another database
    /// - `ArtifactParse` when the existing document's payload is unreadable
    ///
    /// In every error case the artifact and state are left untouched.
    pub fn sync(
        &self,
        extractor: &dyn MetadataExtractor,
        requested: &[String],
    ) -> Result<SyncReport> {
        if requested.is_empty() {
            return Err(Error::NoTablesSpecified {
                hint: "the requested table list is empty".to_string(),
            });
        }

        let preflight = self.preflight(true)?;
        let had_prior = preflight.prior.is_some();
        let fetched = fetch_tables(extractor, requested);

        let outcome = merge(
            preflight.prior,
            fetched.tables,
            requested,
            &self.context.database.database,
        );
        let mut payload = outcome.payload;
        let now = Utc::now();
        if !had_prior || !outcome.updated.is_empty() {
            payload.set_generated_at(now);
        }

        let not_found: Vec<String> = outcome
            .not_found
            .into_iter()
            .filter(|name| !fetched.skipped.iter().any(|s| s.table == *name))
            .collect();
        for name in &not_found {
            tracing::warn!(table = %name, "{}", Error::TableNotFound { table: name.clone() });
        }

        if !self.context.options.dry_run {
            self.commit(&payload, outcome.updated.clone(), now, preflight.state.as_ref())?;
        }

        tracing::info!(
            updated = outcome.updated.len(),
            added = outcome.added.len(),
            not_found = not_found.len(),
            skipped = fetched.skipped.len(),
            total = payload.len(),
            dry_run = self.context.options.dry_run,
            "incremental sync finished"
        );

        Ok(self.report(
            RunMode::Incremental,
            preflight.guard,
            preflight.warnings,
            &payload,
            outcome.updated,
            outcome.added,
            not_found,
            fetched.skipped,
        ))
    }

    /// Document every table the extractor lists that `filter` allows.
    ///
    /// Prior tables are not merged, but the guard still runs: a full run
    /// never overwrites another database's document. A readable document
    /// without state is checked by the database name it records.
    pub fn generate(
        &self,
        extractor: &dyn MetadataExtractor,
        filter: &TableFilter,
    ) -> Result<SyncReport> {
        let preflight = self.preflight(false)?;

        let listed = extractor.list_tables().map_err(|e| Error::Extraction {
            message: format!("listing tables: {}", e),
        })?;
        let tables = filter.apply(listed);
        if tables.is_empty() {
            return Err(Error::NoTablesSpecified {
                hint: "the database has no tables matching the include/exclude filters"
                    .to_string(),
            });
        }
        tracing::debug!(count = tables.len(), "documenting tables");

        let fetched = fetch_tables(extractor, &tables);
        let outcome = merge(
            None,
            fetched.tables,
            &tables,
            &self.context.database.database,
        );
        let mut payload = outcome.payload;
        let now = Utc::now();
        payload.set_generated_at(now);

        let not_found: Vec<String> = outcome
            .not_found
            .into_iter()
            .filter(|name| !fetched.skipped.iter().any(|s| s.table == *name))
            .collect();

        if !self.context.options.dry_run {
            self.commit(&payload, outcome.updated.clone(), now, preflight.state.as_ref())?;
        }

        tracing::info!(
            total = payload.len(),
            skipped = fetched.skipped.len(),
            dry_run = self.context.options.dry_run,
            "full generation finished"
        );

        Ok(self.report(
            RunMode::Full,
            preflight.guard,
            preflight.warnings,
            &payload,
            outcome.updated,
            outcome.added,
            not_found,
            fetched.skipped,
        ))
    }

    /// Inspect the document and its state without writing anything.
    pub fn status(&self) -> Result<StatusReport> {
        let bytes = io::read_if_exists(&self.context.artifact_path)?;

        let (prior, artifact_error) = match &bytes {
            Some(bytes) => match decode_artifact(&self.context.artifact_path, bytes) {
                Ok(payload) => (Some(payload), None),
                Err(e) => (None, Some(e.to_string())),
            },
            None => (None, None),
        };
        let artifact_tables = prior.as_ref().map(DocumentPayload::len);

        let (state, state_error) = match SyncStateRecord::load(&self.context.state_path) {
            Ok(state) => (state, None),
            Err(e @ Error::CorruptState { .. }) => (None, Some(e.to_string())),
            Err(e) => return Err(e),
        };

        let identity_matches = match (&state, &prior) {
            (Some(state), _) => Some(state.database == *self.identity()),
            (None, Some(prior)) => Some(self.guard.check_payload(prior).is_ok()),
            (None, None) => None,
        };
        let artifact_modified = match (&state, &bytes) {
            (Some(state), Some(bytes)) => state
                .artifact_checksum
                .as_ref()
                .map(|recorded| *recorded != compute_checksum(bytes)),
            _ => None,
        };

        Ok(StatusReport {
            artifact_path: self.context.artifact_path.to_string(),
            state_path: self.context.state_path.to_string(),
            configured: self.identity().clone(),
            artifact_exists: bytes.is_some(),
            artifact_tables,
            artifact_error,
            state,
            state_error,
            identity_matches,
            artifact_modified,
        })
    }

    /// Load state, run the guard, and read the prior payload if asked to.
    fn preflight(&self, read_prior: bool) -> Result<Preflight> {
        let mut warnings = Vec::new();

        let state = match SyncStateRecord::load(&self.context.state_path) {
            Ok(state) => state,
            Err(e @ Error::CorruptState { .. }) => {
                let message = format!("{}; treating this run as a first sync", e);
                tracing::warn!("{}", message);
                warnings.push(message);
                None
            }
            Err(e) => return Err(e),
        };

        let bytes = io::read_if_exists(&self.context.artifact_path)?;
        let guard = self.guard.check(state.as_ref(), bytes.as_deref())?;
        warnings.extend(guard.warnings.iter().cloned());

        let prior = match (&bytes, read_prior) {
            (Some(bytes), true) => Some(decode_artifact(&self.context.artifact_path, bytes)?),
            // A full run can replace an unreadable document, but not a readable
            // one that names another database.
            (Some(bytes), false) => decode_artifact(&self.context.artifact_path, bytes).ok(),
            (None, _) => None,
        };
        if let Some(prior) = &prior {
            self.guard.check_payload(prior)?;
        }
        let prior = prior.filter(|_| read_prior);

        Ok(Preflight {
            state,
            guard,
            prior,
            warnings,
        })
    }

    /// Write the artifact, then the state that describes it.
    fn commit(
        &self,
        payload: &DocumentPayload,
        updated: Vec<String>,
        now: chrono::DateTime<Utc>,
        prior: Option<&SyncStateRecord>,
    ) -> Result<()> {
        let html = render_artifact(payload)?;
        io::write_text(&self.context.artifact_path, &html)?;

        let record = SyncStateRecord::new(
            self.identity().clone(),
            payload,
            updated,
            Some(compute_content_checksum(&html)),
            now,
        )
        .carry_over(prior);
        record.save(&self.context.state_path)?;

        tracing::debug!(
            artifact = %self.context.artifact_path,
            state = %self.context.state_path,
            "committed document and state"
        );
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn report(
        &self,
        mode: RunMode,
        guard: GuardReport,
        warnings: Vec<String>,
        payload: &DocumentPayload,
        updated: Vec<String>,
        added: Vec<String>,
        not_found: Vec<String>,
        skipped: Vec<SkippedTable>,
    ) -> SyncReport {
        SyncReport {
            mode,
            dry_run: self.context.options.dry_run,
            guard: guard.outcome,
            updated,
            added,
            not_found,
            skipped,
            tables_count: payload.len(),
            warnings,
            artifact_path: self.context.artifact_path.to_string(),
            state_path: self.context.state_path.to_string(),
        }
    }
}
