//! Error types for datadict-extract

/// Result type for datadict-extract operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the source database
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured dialect has no SQLx driver
    #[error("Driver '{driver}' is not supported for extraction (supported: mysql, postgresql, sqlite)")]
    UnsupportedDriver { driver: String },

    /// Connecting to the database failed
    #[error("Cannot connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    /// A catalog query failed
    #[error("Query failed for {context}: {source}")]
    Query {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// The async runtime could not be started
    #[error("Cannot start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn query(context: impl Into<String>) -> impl FnOnce(sqlx::Error) -> Self {
        let context = context.into();
        move |source| Self::Query { context, source }
    }
}
