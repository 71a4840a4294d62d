//! Filesystem primitives for datadict
//!
//! Everything that touches the disk on behalf of the sync engine goes through
//! this crate: path normalization, atomic locked writes, checksums and the
//! format-agnostic config loader.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
