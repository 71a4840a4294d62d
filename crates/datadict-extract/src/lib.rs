//! Live database metadata extraction for datadict
//!
//! [`SqlxExtractor`] implements [`datadict_core::MetadataExtractor`] on top of
//! SQLx for PostgreSQL, MySQL and SQLite. Each dialect reads its own system
//! catalog; the engine only ever sees [`datadict_core::TableMetadata`].
//!
//! The extractor owns a current-thread Tokio runtime so the synchronous sync
//! engine can drive it without being async itself.

pub mod dialect;
pub mod error;
pub mod extractor;

pub use error::{Error, Result};
pub use extractor::{SqlxExtractor, test_connection};
