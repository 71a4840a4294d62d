//! Configuration for datadict.
//!
//! Describes which database to document and where the generated documents go.
//! A configuration file is either single-environment (one `[database]` table) or
//! multi-environment (`[databases.<name>]` tables plus `[environment] default`).

pub mod config;
pub mod error;
pub mod loader;

pub use config::{DatabaseConfig, Driver, OutputConfig, OutputFormat, SyncConfig};
pub use error::{Error, Result};
pub use loader::{Config, Environments, list_environments, load_config};
