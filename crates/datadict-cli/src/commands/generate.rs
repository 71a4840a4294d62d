//! Full document generation

use colored::Colorize;
use datadict_core::{
    Identity, SyncContext, SyncEngine, TableFilter, fetch_tables, merge, normalize_names,
};
use datadict_extract::SqlxExtractor;
use datadict_meta::{Config, OutputFormat};
use datadict_render::{RenderTarget, render};

use crate::commands::print_warnings;
use crate::error::{CliError, Result};

/// Overrides for a generate run.
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    pub format: Option<OutputFormat>,
    pub output_file: Option<String>,
    pub include_tables: Vec<String>,
    pub exclude_tables: Vec<String>,
    pub max_tables_per_file: Option<usize>,
}

impl GenerateArgs {
    fn filter(&self) -> TableFilter {
        let include = normalize_names(&self.include_tables);
        TableFilter {
            include: (!include.is_empty()).then_some(include),
            exclude: normalize_names(&self.exclude_tables),
        }
    }
}

/// Run the generate command
///
/// The interactive format goes through the sync engine so its state file is
/// written; every other format is rendered in one pass.
pub fn run_generate(mut config: Config, args: GenerateArgs) -> Result<()> {
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(name) = &args.output_file {
        config.output.filename = Some(name.clone());
    }
    if let Some(max) = args.max_tables_per_file {
        config.output.max_tables_per_file = max;
    }
    let filter = args.filter();

    println!(
        "{} Documenting {} as {}...",
        "=>".blue().bold(),
        Identity::of(&config.database),
        config.output.format.to_string().cyan()
    );
    let extractor = SqlxExtractor::connect(&config.database)?;

    if config.output.format == OutputFormat::InteractiveHtml {
        let engine = SyncEngine::new(SyncContext::for_output(
            config.database.clone(),
            &config.output,
        ));
        let report = engine.generate(&extractor, &filter)?;

        print_warnings(&report.warnings);
        for skipped in &report.skipped {
            println!("   {} {}: {}", "-".yellow(), skipped.table.cyan(), skipped.reason);
        }
        println!(
            "{} Documented {} tables in {}",
            "OK".green().bold(),
            report.tables_count,
            report.artifact_path.cyan()
        );
        return Ok(());
    }

    let tables = filter.apply(extractor.tables()?);
    if tables.is_empty() {
        return Err(CliError::user(
            "No tables to document: the database has no tables matching the include/exclude filters",
        ));
    }

    let fetched = fetch_tables(&extractor, &tables);
    let skipped = fetched.skipped;
    let payload = merge(None, fetched.tables, &tables, &config.database.database).payload;
    let rendered = render(
        config.output.format,
        &payload,
        &RenderTarget::new(&config.output, &config.database),
    )?;

    print_warnings(&rendered.warnings);
    for skipped in &skipped {
        println!("   {} {}: {}", "-".yellow(), skipped.table.cyan(), skipped.reason);
    }
    println!(
        "{} Documented {} tables:",
        "OK".green().bold(),
        payload.len()
    );
    for file in &rendered.files {
        println!("   {} {}", "+".green(), file.as_str().cyan());
    }
    Ok(())
}
