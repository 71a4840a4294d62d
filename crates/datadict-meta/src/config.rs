//! Configuration types
//!
//! Sections of a datadict configuration file: the database to document, where
//! output goes, and the defaults for incremental sync runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Database dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Driver {
    Mysql,
    Postgresql,
    Sqlserver,
    Oracle,
    /// File-backed; `database` is the file path and host/user are unused.
    Sqlite,
}

impl Driver {
    /// Port used when the configuration does not name one.
    pub fn default_port(&self) -> u16 {
        match self {
            Driver::Mysql => 3306,
            Driver::Postgresql => 5432,
            Driver::Sqlserver => 1433,
            Driver::Oracle => 1521,
            Driver::Sqlite => 0,
        }
    }

    /// Whether the dialect is reached over the network.
    pub fn is_networked(&self) -> bool {
        !matches!(self, Driver::Sqlite)
    }
}

impl FromStr for Driver {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Driver::Mysql),
            "postgresql" | "postgres" | "pg" => Ok(Driver::Postgresql),
            "sqlserver" | "mssql" => Ok(Driver::Sqlserver),
            "oracle" => Ok(Driver::Oracle),
            "sqlite" => Ok(Driver::Sqlite),
            _ => Err(Error::InvalidDriver {
                driver: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Driver {
    type Error = Error;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Driver::Mysql => "mysql",
            Driver::Postgresql => "postgresql",
            Driver::Sqlserver => "sqlserver",
            Driver::Oracle => "oracle",
            Driver::Sqlite => "sqlite",
        };
        write!(f, "{}", name)
    }
}

/// Connection settings for the documented database.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(alias = "type")]
    pub driver: Driver,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    /// Database name (file path for SQLite).
    pub database: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    /// Schema to introspect; dialect default when absent.
    #[serde(default)]
    pub schema: Option<String>,
    /// ODBC driver name for SQL Server setups.
    #[serde(default)]
    pub odbc_driver: Option<String>,
}

impl DatabaseConfig {
    /// Configured port, or the driver's default.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.driver.default_port())
    }

    /// Check required fields. Returns a description of the first problem.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.database.trim().is_empty() {
            return Err("database name must not be empty".to_string());
        }
        if self.driver.is_networked() {
            if self.host.trim().is_empty() {
                return Err(format!("{} requires a host", self.driver));
            }
            if self.user.trim().is_empty() {
                return Err(format!("{} requires a user", self.driver));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("schema", &self.schema)
            .field("odbc_driver", &self.odbc_driver)
            .finish()
    }
}

/// Document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum OutputFormat {
    Markdown,
    Excel,
    Csv,
    Html,
    /// Single searchable page with an embedded payload; the only format that
    /// supports incremental sync.
    #[default]
    InteractiveHtml,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "excel" | "xlsx" => Ok(OutputFormat::Excel),
            "csv" => Ok(OutputFormat::Csv),
            "html" => Ok(OutputFormat::Html),
            "interactive-html" | "interactive_html" | "interactive" => {
                Ok(OutputFormat::InteractiveHtml)
            }
            _ => Err(Error::InvalidFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = Error;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Excel => "excel",
            OutputFormat::Csv => "csv",
            OutputFormat::Html => "html",
            OutputFormat::InteractiveHtml => "interactive-html",
        };
        write!(f, "{}", name)
    }
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_max_tables_per_file() -> usize {
    50
}

/// Where and how documents are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Base file name; derived from host and database when absent.
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default = "default_directory")]
    pub directory: String,
    #[serde(default = "default_max_tables_per_file")]
    pub max_tables_per_file: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            filename: None,
            directory: default_directory(),
            max_tables_per_file: default_max_tables_per_file(),
        }
    }
}

impl OutputConfig {
    /// Base name for output files: the configured filename, or
    /// `<host>_<database>` with dots replaced by underscores.
    pub fn base_name(&self, database: &DatabaseConfig) -> String {
        if let Some(name) = self.filename.as_deref().map(str::trim)
            && !name.is_empty()
        {
            return name.to_string();
        }

        let db_name = std::path::Path::new(&database.database)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| database.database.clone());

        let host = if database.host.is_empty() {
            "local"
        } else {
            database.host.as_str()
        };
        format!("{}_{}", host.replace('.', "_"), db_name.replace('.', "_"))
    }
}

fn default_tables_file() -> String {
    "sync_tables.txt".to_string()
}

/// Defaults for incremental runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Table list used when neither `--tables` nor `--tables-file` is given.
    #[serde(default = "default_tables_file")]
    pub tables_file: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tables_file: default_tables_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postgres() -> DatabaseConfig {
        DatabaseConfig {
            driver: Driver::Postgresql,
            host: "db.example.com".into(),
            port: None,
            database: "shop".into(),
            user: "reader".into(),
            password: "hunter2".into(),
            schema: None,
            odbc_driver: None,
        }
    }

    #[test]
    fn test_driver_aliases() {
        assert_eq!("postgres".parse::<Driver>().unwrap(), Driver::Postgresql);
        assert_eq!("PG".parse::<Driver>().unwrap(), Driver::Postgresql);
        assert_eq!("mssql".parse::<Driver>().unwrap(), Driver::Sqlserver);
        assert_eq!("MySQL".parse::<Driver>().unwrap(), Driver::Mysql);
        assert!("db2".parse::<Driver>().is_err());
    }

    #[test]
    fn test_driver_display_round_trips() {
        for driver in [
            Driver::Mysql,
            Driver::Postgresql,
            Driver::Sqlserver,
            Driver::Oracle,
            Driver::Sqlite,
        ] {
            assert_eq!(driver.to_string().parse::<Driver>().unwrap(), driver);
        }
    }

    #[test]
    fn test_effective_port_defaults_per_driver() {
        let mut config = postgres();
        assert_eq!(config.effective_port(), 5432);
        config.port = Some(6543);
        assert_eq!(config.effective_port(), 6543);
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", postgres());
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_validate_requires_host_for_network_drivers() {
        let mut config = postgres();
        assert!(config.validate().is_ok());
        config.host.clear();
        assert!(config.validate().unwrap_err().contains("host"));
    }

    #[test]
    fn test_validate_sqlite_needs_only_database() {
        let config = DatabaseConfig {
            driver: Driver::Sqlite,
            host: String::new(),
            port: None,
            database: "shop.db".into(),
            user: String::new(),
            password: String::new(),
            schema: None,
            odbc_driver: None,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_name_derived_from_host_and_database() {
        let output = OutputConfig::default();
        assert_eq!(output.base_name(&postgres()), "db_example_com_shop");
    }

    #[test]
    fn test_base_name_prefers_configured_filename() {
        let output = OutputConfig {
            filename: Some("catalog".into()),
            ..OutputConfig::default()
        };
        assert_eq!(output.base_name(&postgres()), "catalog");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(
            "interactive-html".parse::<OutputFormat>().unwrap(),
            OutputFormat::InteractiveHtml
        );
        assert_eq!("xlsx".parse::<OutputFormat>().unwrap(), OutputFormat::Excel);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }
}
