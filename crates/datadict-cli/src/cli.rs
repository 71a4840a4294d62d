//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use datadict_meta::OutputFormat;

/// datadict - Generate and incrementally sync database data dictionaries
#[derive(Parser, Debug)]
#[command(name = "datadict")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, env = "DATADICT_CONFIG", default_value = "config.toml")]
    pub config: PathBuf,

    /// Environment to use from a multi-environment configuration
    #[arg(short, long, global = true)]
    pub env: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    value.parse().map_err(|e: datadict_meta::Error| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Document the whole database
    ///
    /// Examples:
    ///   datadict generate                          # format from config.toml
    ///   datadict generate --format excel
    ///   datadict generate --exclude-tables audit_log,sessions
    Generate {
        /// Output format: markdown, excel, csv, html or interactive-html
        #[arg(short, long, value_parser = parse_format)]
        format: Option<OutputFormat>,

        /// Base file name, overriding output.filename
        #[arg(short, long)]
        output_file: Option<String>,

        /// Only document these tables (comma separated)
        #[arg(long, value_delimiter = ',')]
        include_tables: Vec<String>,

        /// Skip these tables (comma separated)
        #[arg(long, value_delimiter = ',')]
        exclude_tables: Vec<String>,

        /// Split Excel and HTML output after this many tables
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_tables_per_file: Option<u32>,
    },

    /// Refresh selected tables in an existing interactive document
    ///
    /// The table list comes from --tables, else --tables-file, else the
    /// configured sync.tables_file.
    ///
    /// Examples:
    ///   datadict sync --tables users,orders
    ///   datadict sync --tables-file changed.txt --dry-run
    Sync {
        /// Tables to refresh (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        tables: Option<Vec<String>>,

        /// File with one table name per line
        #[arg(long)]
        tables_file: Option<PathBuf>,

        /// Preview the merge without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Output the report as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the interactive document and its sync state
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the environments the configuration declares
    ListEnv,

    /// Check that the configured database is reachable
    TestConnection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_tables_split_on_commas() {
        let cli = Cli::parse_from(["datadict", "sync", "--tables", "users,orders"]);
        assert_eq!(
            cli.command,
            Some(Commands::Sync {
                tables: Some(vec!["users".to_string(), "orders".to_string()]),
                tables_file: None,
                dry_run: false,
                json: false,
            })
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["datadict", "status", "--env", "prod", "-c", "other.toml"]);
        assert_eq!(cli.env.as_deref(), Some("prod"));
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }

    #[test]
    fn test_generate_format_aliases() {
        let cli = Cli::parse_from(["datadict", "generate", "--format", "xlsx"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Generate {
                format: Some(OutputFormat::Excel),
                ..
            })
        ));
    }

    #[test]
    fn test_generate_rejects_zero_split() {
        assert!(
            Cli::try_parse_from(["datadict", "generate", "--max-tables-per-file", "0"]).is_err()
        );
    }
}
