//! list-env and test-connection

use std::path::Path;

use colored::Colorize;
use datadict_core::Identity;
use datadict_extract::test_connection;
use datadict_fs::NormalizedPath;
use datadict_meta::list_environments;

use crate::commands::load;
use crate::error::Result;

/// Run the list-env command
pub fn run_list_env(config: &Path) -> Result<()> {
    let environments = list_environments(&NormalizedPath::new(config))?;

    if environments.names.is_empty() {
        println!(
            "{} has a single [database] section; no environments to select.",
            config.display()
        );
        return Ok(());
    }

    println!("{}:", "Environments".bold());
    for name in &environments.names {
        if environments.default.as_deref() == Some(name.as_str()) {
            println!("  {} {} {}", "*".green(), name.cyan(), "(default)".dimmed());
        } else {
            println!("    {}", name.cyan());
        }
    }
    Ok(())
}

/// Run the test-connection command
pub fn run_test_connection(config: &Path, env: Option<&str>) -> Result<()> {
    let config = load(config, env)?;
    let identity = Identity::of(&config.database);

    println!("{} Connecting to {}...", "=>".blue().bold(), identity);
    test_connection(&config.database)?;
    println!("{} Connection succeeded.", "OK".green().bold());
    Ok(())
}
