//! Incremental sync command

use std::path::PathBuf;

use colored::Colorize;
use datadict_core::{
    GuardOutcome, SyncContext, SyncEngine, SyncOptions, SyncReport, TableListOrigin,
    TableListRequest, resolve_tables,
};
use datadict_extract::SqlxExtractor;
use datadict_fs::NormalizedPath;
use datadict_meta::{Config, OutputFormat};

use crate::commands::print_warnings;
use crate::error::Result;

/// Options for a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncArgs {
    pub tables: Option<Vec<String>>,
    pub tables_file: Option<PathBuf>,
    pub dry_run: bool,
    pub json: bool,
}

/// Run the sync command
///
/// Resolves the table list before connecting, so a missing list fails
/// without touching the database.
pub fn run_sync(config: Config, args: SyncArgs) -> Result<()> {
    let selection = resolve_tables(&TableListRequest {
        inline: args.tables,
        file: args.tables_file.map(NormalizedPath::new),
        default_file: NormalizedPath::new(&config.sync.tables_file),
    })?;
    tracing::info!(origin = %selection.origin, count = selection.tables.len(), "resolved table list");

    if config.output.format != OutputFormat::InteractiveHtml {
        tracing::info!(
            format = %config.output.format,
            "sync always updates the interactive document"
        );
    }

    let extractor = SqlxExtractor::connect(&config.database)?;
    let engine = SyncEngine::new(
        SyncContext::for_output(config.database, &config.output).with_options(SyncOptions {
            dry_run: args.dry_run,
        }),
    );
    let report = engine.sync(&extractor, &selection.tables)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &selection.origin);
    }
    Ok(())
}

fn print_report(report: &SyncReport, origin: &TableListOrigin) {
    println!(
        "{} Synced tables from {} into {}",
        "=>".blue().bold(),
        origin.to_string().cyan(),
        report.artifact_path.cyan()
    );

    match report.guard {
        GuardOutcome::Verified => println!("   {} database identity verified", "ok".green()),
        GuardOutcome::FirstRun => println!("   {} no existing document, creating it", "new".cyan()),
        GuardOutcome::Unverified => println!(
            "   {} existing document has no usable sync state; identity not verified",
            "!".yellow()
        ),
    }
    print_warnings(&report.warnings);

    for table in &report.updated {
        if report.added.contains(table) {
            println!("   {} {} {}", "+".green(), table.cyan(), "(added)".dimmed());
        } else {
            println!("   {} {}", "~".green(), table.cyan());
        }
    }
    for table in &report.not_found {
        println!("   {} {} {}", "?".yellow(), table.cyan(), "(not found)".dimmed());
    }
    for skipped in &report.skipped {
        println!("   {} {}: {}", "-".red(), skipped.table.cyan(), skipped.reason);
    }

    println!();
    let label = if report.dry_run {
        "DRY RUN".yellow().bold()
    } else if report.is_partial() {
        "PARTIAL".yellow().bold()
    } else {
        "OK".green().bold()
    };
    println!(
        "{} {} updated, {} not found, {} skipped; document holds {} tables",
        label,
        report.updated.len(),
        report.not_found.len(),
        report.skipped.len(),
        report.tables_count
    );
    if report.dry_run {
        println!("Nothing was written.");
    }
}
