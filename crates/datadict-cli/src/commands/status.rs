//! Status command implementation

use colored::Colorize;
use datadict_core::{StatusReport, SyncContext, SyncEngine};
use datadict_meta::Config;

use crate::error::Result;

/// Run the status command
pub fn run_status(config: Config, json: bool) -> Result<()> {
    let engine = SyncEngine::new(SyncContext::for_output(config.database, &config.output));
    let report = engine.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_status(&report);
    }
    Ok(())
}

fn print_status(report: &StatusReport) {
    println!("{}", "Document Status".bold());
    println!();
    println!("{}:   {}", "Database".dimmed(), report.configured);
    println!("{}:   {}", "Document".dimmed(), report.artifact_path);
    println!("{}:      {}", "State".dimmed(), report.state_path);
    println!();

    if !report.artifact_exists {
        println!("{}", "No document yet".yellow().bold());
        println!();
        println!("Run {} or {} to create it.", "datadict generate".cyan(), "datadict sync".cyan());
        return;
    }

    match (&report.artifact_tables, &report.artifact_error) {
        (Some(count), _) => println!("  {} {} tables documented", "+".green(), count),
        (None, Some(error)) => println!("  {} {}", "!".red(), error),
        (None, None) => {}
    }

    match (&report.state, &report.state_error) {
        (Some(state), _) => {
            println!(
                "  {} last sync {} ({} tables, {} updated)",
                "+".green(),
                state.last_sync.to_rfc3339(),
                state.tables_count,
                state.updated_tables.len()
            );
            if report.identity_matches == Some(false) {
                println!(
                    "  {} document belongs to {}, not the configured database",
                    "!".red(),
                    state.database
                );
            }
        }
        (None, Some(error)) => println!("  {} {}", "!".red(), error),
        (None, None) if report.identity_matches == Some(false) => println!(
            "  {} no sync state, and the document names another database",
            "!".red()
        ),
        (None, None) => println!("  {} no sync state; provenance unknown", "!".yellow()),
    }
    if report.artifact_modified == Some(true) {
        println!("  {} document was modified since the last sync", "!".yellow());
    }

    println!();
    if report.is_healthy() {
        println!("{} Ready to sync.", "OK".green().bold());
    } else {
        println!("{} Resolve the issues above before syncing.", "ATTENTION".yellow().bold());
    }
}
