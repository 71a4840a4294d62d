//! Error types for datadict-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] datadict_core::Error),

    #[error(transparent)]
    Meta(#[from] datadict_meta::Error),

    #[error(transparent)]
    Extract(#[from] datadict_extract::Error),

    #[error(transparent)]
    Render(#[from] datadict_render::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
