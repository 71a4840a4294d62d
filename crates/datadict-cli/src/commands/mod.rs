//! Command implementations for datadict-cli

pub mod env;
pub mod generate;
pub mod status;
pub mod sync;

use std::path::Path;

use colored::Colorize;
use datadict_fs::NormalizedPath;
use datadict_meta::{Config, load_config};

use crate::error::Result;

pub use env::{run_list_env, run_test_connection};
pub use generate::{GenerateArgs, run_generate};
pub use status::run_status;
pub use sync::{SyncArgs, run_sync};

/// Load the configuration selected by the global flags.
pub fn load(config: &Path, env: Option<&str>) -> Result<Config> {
    let config = load_config(&NormalizedPath::new(config), env)?;
    tracing::debug!(source = %config.source, environment = ?config.environment, "loaded configuration");
    Ok(config)
}

pub(crate) fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("   {} {}", "!".yellow(), warning);
    }
}
