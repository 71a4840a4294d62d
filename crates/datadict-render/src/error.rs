//! Error types for datadict-render

use datadict_meta::OutputFormat;

/// Result type for datadict-render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering documents
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The format is not rendered statically
    #[error("{format} documents are written by the sync engine, not the static renderer")]
    NotStatic { format: OutputFormat },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Excel error: {0}")]
    Xlsx(String),

    /// Filesystem error from datadict-fs
    #[error(transparent)]
    Fs(#[from] datadict_fs::Error),
}
