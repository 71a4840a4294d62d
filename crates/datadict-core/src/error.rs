//! Error types for datadict-core

use std::path::PathBuf;

use crate::identity::Identity;

/// Result type for datadict-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in datadict-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The resolved table list is empty after normalization
    #[error("No tables specified: {hint}")]
    NoTablesSpecified { hint: String },

    /// An explicitly named table list file does not exist
    #[error("Table list file not found: {path}")]
    TableListNotFound { path: PathBuf },

    /// The existing artifact exists but its payload cannot be trusted
    #[error("Cannot read document payload from {path}: {reason}")]
    ArtifactParse { path: PathBuf, reason: String },

    /// The sync state file exists but cannot be parsed
    #[error("Corrupt sync state at {path}: {reason}")]
    CorruptState { path: PathBuf, reason: String },

    /// The configured database differs from the one the document was built from
    #[error(
        "Database mismatch: document was generated from {expected}, but the configuration points at {actual}"
    )]
    DatabaseMismatch {
        expected: Box<Identity>,
        actual: Box<Identity>,
    },

    /// A requested table does not exist in the source database
    #[error("Table not found: {table}")]
    TableNotFound { table: String },

    /// Extraction failed for a reason other than the table being absent
    #[error("Extraction failed: {message}")]
    Extraction { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from datadict-fs
    #[error(transparent)]
    Fs(#[from] datadict_fs::Error),

    /// Envelope error from datadict-blocks
    #[error(transparent)]
    Blocks(#[from] datadict_blocks::Error),

    /// Configuration error from datadict-meta
    #[error(transparent)]
    Meta(#[from] datadict_meta::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
