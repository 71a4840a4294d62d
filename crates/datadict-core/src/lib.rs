//! Core orchestration layer for datadict
//!
//! This crate turns extracted table metadata into a maintained data
//! dictionary and keeps it current without regenerating everything:
//!
//! - **Model**: [`DocumentPayload`], the ordered table catalog embedded in the
//!   interactive document
//! - **Artifact codec**: reading and writing the payload envelope inside the
//!   HTML page
//! - **Merge**: table-level upsert of freshly extracted records into a prior
//!   payload
//! - **State**: the sidecar record of the last run and the database identity
//!   it was made against
//! - **Guard**: refusing to merge one database's metadata into another's
//!   document
//! - **SyncEngine**: the full and incremental runs that tie it together
//!
//! # Architecture
//!
//! ```text
//!                 datadict-cli
//!                      |
//!     +----------------+----------------+
//!     |                |                |
//! datadict-core  datadict-extract  datadict-render
//!     |
//!     +----------------+----------------+
//!     |                |                |
//! datadict-fs   datadict-blocks   datadict-meta
//! ```
//!
//! Extraction sits behind the [`MetadataExtractor`] trait so the engine can be
//! driven by a live database or by [`MemoryExtractor`] in tests.

pub mod artifact;
pub mod error;
pub mod extract;
pub mod guard;
pub mod identity;
pub mod merge;
pub mod model;
pub mod state;
pub mod sync;
pub mod tables;

pub use artifact::{
    PAYLOAD_TAG, PAYLOAD_VERSION, decode_artifact, parse_artifact, read_artifact, render_artifact,
};
pub use error::{Error, Result};
pub use extract::{
    ExtractError, Fetched, MemoryExtractor, MetadataExtractor, TableFilter, fetch_tables,
};
pub use guard::{ConsistencyGuard, GuardOutcome, GuardReport};
pub use identity::Identity;
pub use merge::{MergeOutcome, merge};
pub use model::{ColumnMetadata, DocumentPayload, PAYLOAD_FORMAT_VERSION, TableMetadata, Upsert};
pub use state::{SyncStateRecord, state_path_for};
pub use sync::{
    RunMode, SkippedTable, StatusReport, SyncContext, SyncEngine, SyncOptions, SyncReport,
    interactive_artifact_path,
};
pub use tables::{
    TableListOrigin, TableListRequest, TableSelection, normalize_names, parse_table_list,
    resolve_tables,
};
