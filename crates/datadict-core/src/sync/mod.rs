//! SyncEngine for keeping a document current
//!
//! This module provides:
//! - **generate**: a full run that documents every selected table
//! - **sync**: an incremental run that refreshes only the requested tables
//! - **status**: a read-only look at the document and its sync state

mod engine;
mod report;

pub use engine::{SyncContext, SyncEngine, SyncOptions, interactive_artifact_path};
pub use report::{RunMode, SkippedTable, StatusReport, SyncReport};
