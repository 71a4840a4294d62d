//! Error types for datadict-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] datadict_fs::Error),

    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Environment '{name}' not defined (available: {})", available.join(", "))]
    UnknownEnvironment {
        name: String,
        available: Vec<String>,
    },

    #[error("No environment selected in {path}: pass --env or set [environment] default")]
    NoEnvironmentSelected { path: PathBuf },

    #[error("Unsupported database driver: {driver}")]
    InvalidDriver { driver: String },

    #[error("Unsupported output format: {format}")]
    InvalidFormat { format: String },
}
