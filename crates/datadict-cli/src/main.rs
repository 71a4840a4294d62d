//! datadict CLI
//!
//! Generates data dictionaries from a live database and keeps the interactive
//! document up to date one table at a time.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::{GenerateArgs, SyncArgs};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging disabled: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(&cli.config, cli.env.as_deref(), cmd),
        None => {
            println!("{} database data dictionaries", "datadict".green().bold());
            println!();
            println!("Run {} for available commands.", "datadict --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(config: &std::path::Path, env: Option<&str>, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Generate {
            format,
            output_file,
            include_tables,
            exclude_tables,
            max_tables_per_file,
        } => commands::run_generate(
            commands::load(config, env)?,
            GenerateArgs {
                format,
                output_file,
                include_tables,
                exclude_tables,
                max_tables_per_file: max_tables_per_file.map(|n| n as usize),
            },
        ),
        Commands::Sync {
            tables,
            tables_file,
            dry_run,
            json,
        } => commands::run_sync(
            commands::load(config, env)?,
            SyncArgs {
                tables,
                tables_file,
                dry_run,
                json,
            },
        ),
        Commands::Status { json } => commands::run_status(commands::load(config, env)?, json),
        Commands::ListEnv => commands::run_list_env(config),
        Commands::TestConnection => commands::run_test_connection(config, env),
    }
}
