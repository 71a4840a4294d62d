//! Configuration file loading
//!
//! Two layouts are accepted:
//!
//! ```toml
//! # single environment
//! [database]
//! driver = "postgresql"
//! host = "db.internal"
//! database = "shop"
//! user = "reader"
//! password = "..."
//! ```
//!
//! ```toml
//! # several environments
//! [environment]
//! default = "dev"
//!
//! [databases.dev]
//! driver = "mysql"
//! # ...
//!
//! [databases.prod]
//! driver = "mysql"
//! # ...
//! ```
//!
//! `[output]` and `[sync]` are shared by every environment.

use std::collections::BTreeMap;

use datadict_fs::{ConfigStore, NormalizedPath};
use serde::Deserialize;

use crate::config::{DatabaseConfig, OutputConfig, SyncConfig};
use crate::{Error, Result};

#[derive(Debug, Default, Deserialize)]
struct EnvironmentSection {
    #[serde(default)]
    default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    environment: EnvironmentSection,
    #[serde(default)]
    database: Option<DatabaseConfig>,
    #[serde(default)]
    databases: BTreeMap<String, DatabaseConfig>,
    #[serde(default)]
    output: OutputConfig,
    #[serde(default)]
    sync: SyncConfig,
}

/// A loaded configuration with its environment resolved.
#[derive(Debug, Clone)]
pub struct Config {
    /// Selected environment; `None` for single-environment files.
    pub environment: Option<String>,
    pub database: DatabaseConfig,
    pub output: OutputConfig,
    pub sync: SyncConfig,
    /// File the configuration was read from.
    pub source: NormalizedPath,
}

/// Environments declared by a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environments {
    /// Sorted environment names; empty for single-environment files.
    pub names: Vec<String>,
    pub default: Option<String>,
}

fn read_file(path: &NormalizedPath) -> Result<ConfigFile> {
    if !path.is_file() {
        return Err(Error::ConfigNotFound {
            path: path.to_native(),
        });
    }
    Ok(ConfigStore::new().load(path)?)
}

/// Load a configuration file and select the environment.
///
/// Environment selection for multi-environment files: `env` if given, else
/// `[environment] default`, else the only declared environment. Asking for an
/// environment in a single-environment file is an error rather than silently
/// documenting a different database.
pub fn load_config(path: &NormalizedPath, env: Option<&str>) -> Result<Config> {
    let file = read_file(path)?;
    let invalid = |message: String| Error::InvalidConfig {
        path: path.to_native(),
        message,
    };

    let (environment, database) = match (file.database, file.databases.is_empty()) {
        (Some(_), false) => {
            return Err(invalid(
                "use either [database] or [databases.<env>], not both".to_string(),
            ));
        }
        (None, true) => {
            return Err(invalid("missing [database] section".to_string()));
        }
        (Some(database), true) => {
            if let Some(name) = env {
                return Err(Error::UnknownEnvironment {
                    name: name.to_string(),
                    available: Vec::new(),
                });
            }
            (None, database)
        }
        (None, false) => {
            let mut databases = file.databases;
            let name = match env.map(str::to_string).or(file.environment.default) {
                Some(name) => name,
                None if databases.len() == 1 => databases
                    .keys()
                    .next()
                    .cloned()
                    .ok_or_else(|| Error::NoEnvironmentSelected {
                        path: path.to_native(),
                    })?,
                None => {
                    return Err(Error::NoEnvironmentSelected {
                        path: path.to_native(),
                    });
                }
            };
            let available: Vec<String> = databases.keys().cloned().collect();
            let database = databases
                .remove(&name)
                .ok_or_else(|| Error::UnknownEnvironment {
                    name: name.clone(),
                    available,
                })?;
            tracing::debug!(environment = %name, "selected environment");
            (Some(name), database)
        }
    };

    database.validate().map_err(invalid)?;
    if file.output.max_tables_per_file == 0 {
        return Err(invalid("output.max_tables_per_file must be at least 1".to_string()));
    }

    Ok(Config {
        environment,
        database,
        output: file.output,
        sync: file.sync,
        source: path.clone(),
    })
}

/// List the environments a configuration file declares.
pub fn list_environments(path: &NormalizedPath) -> Result<Environments> {
    let file = read_file(path)?;
    Ok(Environments {
        names: file.databases.keys().cloned().collect(),
        default: file.environment.default,
    })
}
