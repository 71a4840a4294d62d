//! Error types for datadict-blocks

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No {tag} envelope found")]
    EnvelopeNotFound { tag: String },

    #[error("Envelope {tag}:v{version} has no closing marker")]
    Unterminated { tag: String, version: u32 },

    #[error("Expected one {tag} envelope, found {count}")]
    Duplicate { tag: String, count: usize },

    #[error("Envelope {tag} has version {found}, only version {supported} is supported")]
    UnsupportedVersion {
        tag: String,
        found: u32,
        supported: u32,
    },

    #[error("Envelope version '{raw}' is not a number")]
    InvalidVersion { raw: String },

    #[error("Placeholder {placeholder} not found in template")]
    PlaceholderNotFound { placeholder: String },

    #[error("Invalid marker pattern: {0}")]
    Regex(#[from] regex::Error),
}
