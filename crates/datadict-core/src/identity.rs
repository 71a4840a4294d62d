//! Database identity fingerprint
//!
//! The identity ties a document to the database it was generated from. The
//! password is not part of it: rotating credentials must not look like a
//! different database.

use std::fmt;

use datadict_meta::DatabaseConfig;
use serde::{Deserialize, Serialize};

/// Name, host, effective port and user of a database connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user: String,
}

impl Identity {
    /// Fingerprint a connection configuration.
    ///
    /// An omitted port resolves to the driver default, so it fingerprints the
    /// same as spelling the default out.
    pub fn of(config: &DatabaseConfig) -> Self {
        Self {
            name: config.database.clone(),
            host: config.host.clone(),
            port: config.effective_port(),
            user: config.user.clone(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.is_empty() {
            return write!(f, "'{}'", self.name);
        }
        write!(
            f,
            "'{}' on {}@{}:{}",
            self.name, self.user, self.host, self.port
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datadict_meta::Driver;

    fn config(port: Option<u16>, password: &str) -> DatabaseConfig {
        DatabaseConfig {
            driver: Driver::Mysql,
            host: "db1".into(),
            port,
            database: "shop".into(),
            user: "reader".into(),
            password: password.into(),
            schema: None,
            odbc_driver: None,
        }
    }

    #[test]
    fn test_password_not_part_of_identity() {
        assert_eq!(Identity::of(&config(None, "a")), Identity::of(&config(None, "b")));
    }

    #[test]
    fn test_default_port_matches_explicit_default() {
        assert_eq!(
            Identity::of(&config(None, "")),
            Identity::of(&config(Some(3306), ""))
        );
        assert_ne!(
            Identity::of(&config(None, "")),
            Identity::of(&config(Some(3307), ""))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Identity::of(&config(None, "")).to_string(),
            "'shop' on reader@db1:3306"
        );
    }
}
