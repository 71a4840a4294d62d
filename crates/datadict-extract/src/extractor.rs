//! SQLx-backed extractor

use std::time::Duration;

use datadict_core::{ExtractError, MetadataExtractor, TableMetadata};
use datadict_meta::{DatabaseConfig, Driver};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{MySqlPool, PgPool, SqlitePool};
use tokio::runtime::{Builder, Runtime};

use crate::dialect::{mysql, postgres, sqlite};
use crate::{Error, Result};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

enum Pool {
    Postgres(PgPool),
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

/// Extracts table metadata from a live database.
pub struct SqlxExtractor {
    // dropped before the runtime
    pool: Pool,
    schema: Option<String>,
    runtime: Runtime,
}

fn target(config: &DatabaseConfig) -> String {
    match config.driver {
        Driver::Sqlite => config.database.clone(),
        _ => format!(
            "{} database '{}' at {}:{}",
            config.driver,
            config.database,
            config.host,
            config.effective_port()
        ),
    }
}

impl SqlxExtractor {
    /// Connect using the configured driver.
    ///
    /// Connection options are built field by field, so passwords need no URL
    /// escaping. SQLite databases are opened read-only and must exist.
    ///
    /// # Errors
    /// `UnsupportedDriver` for SQL Server and Oracle, `Connect` when the
    /// database is unreachable.
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let connect_error = |source| Error::Connect {
            target: target(config),
            source,
        };

        let pool = match config.driver {
            Driver::Postgresql => {
                let options = PgConnectOptions::new()
                    .host(&config.host)
                    .port(config.effective_port())
                    .username(&config.user)
                    .password(&config.password)
                    .database(&config.database);
                let pool = runtime
                    .block_on(
                        PgPoolOptions::new()
                            .max_connections(1)
                            .acquire_timeout(ACQUIRE_TIMEOUT)
                            .connect_with(options),
                    )
                    .map_err(connect_error)?;
                Pool::Postgres(pool)
            }
            Driver::Mysql => {
                let options = MySqlConnectOptions::new()
                    .host(&config.host)
                    .port(config.effective_port())
                    .username(&config.user)
                    .password(&config.password)
                    .database(&config.database);
                let pool = runtime
                    .block_on(
                        MySqlPoolOptions::new()
                            .max_connections(1)
                            .acquire_timeout(ACQUIRE_TIMEOUT)
                            .connect_with(options),
                    )
                    .map_err(connect_error)?;
                Pool::MySql(pool)
            }
            Driver::Sqlite => {
                let options = SqliteConnectOptions::new()
                    .filename(&config.database)
                    .read_only(true);
                let pool = runtime
                    .block_on(
                        SqlitePoolOptions::new()
                            .max_connections(1)
                            .acquire_timeout(ACQUIRE_TIMEOUT)
                            .connect_with(options),
                    )
                    .map_err(connect_error)?;
                Pool::Sqlite(pool)
            }
            Driver::Sqlserver | Driver::Oracle => {
                return Err(Error::UnsupportedDriver {
                    driver: config.driver.to_string(),
                });
            }
        };

        tracing::debug!(database = %target(config), "connected");
        Ok(Self {
            pool,
            schema: config.schema.clone(),
            runtime,
        })
    }

    /// Round-trip a trivial query.
    pub fn ping(&self) -> Result<()> {
        let result = match &self.pool {
            Pool::Postgres(pool) => self
                .runtime
                .block_on(sqlx::query("SELECT 1").execute(pool))
                .map(|_| ()),
            Pool::MySql(pool) => self
                .runtime
                .block_on(sqlx::query("SELECT 1").execute(pool))
                .map(|_| ()),
            Pool::Sqlite(pool) => self
                .runtime
                .block_on(sqlx::query("SELECT 1").execute(pool))
                .map(|_| ()),
        };
        result.map_err(Error::query("connection check"))
    }

    fn pg_schema(&self) -> &str {
        self.schema.as_deref().unwrap_or(postgres::DEFAULT_SCHEMA)
    }

    /// All base tables in the configured schema, sorted by name.
    pub fn tables(&self) -> Result<Vec<String>> {
        match &self.pool {
            Pool::Postgres(pool) => self
                .runtime
                .block_on(postgres::list_tables(pool, self.pg_schema())),
            Pool::MySql(pool) => self
                .runtime
                .block_on(mysql::list_tables(pool, self.schema.as_deref())),
            Pool::Sqlite(pool) => self.runtime.block_on(sqlite::list_tables(pool)),
        }
    }

    /// Metadata for one table, `None` when it does not exist.
    pub fn table(&self, name: &str) -> Result<Option<TableMetadata>> {
        let table = match &self.pool {
            Pool::Postgres(pool) => self
                .runtime
                .block_on(postgres::extract(pool, self.pg_schema(), name)),
            Pool::MySql(pool) => self
                .runtime
                .block_on(mysql::extract(pool, self.schema.as_deref(), name)),
            Pool::Sqlite(pool) => self.runtime.block_on(sqlite::extract(pool, name)),
        }?;
        tracing::debug!(
            table = name,
            columns = table.as_ref().map(|t| t.columns.len()),
            "extracted"
        );
        Ok(table)
    }
}

impl MetadataExtractor for SqlxExtractor {
    fn list_tables(&self) -> std::result::Result<Vec<String>, ExtractError> {
        Ok(self.tables()?)
    }

    fn extract(&self, table: &str) -> std::result::Result<Option<TableMetadata>, ExtractError> {
        Ok(self.table(table)?)
    }
}

/// Connect and run a trivial query.
pub fn test_connection(config: &DatabaseConfig) -> Result<()> {
    SqlxExtractor::connect(config)?.ping()
}
