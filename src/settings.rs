//! Runtime settings from environment variables (optionally seeded from `config.env`).

use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::fmt;
use std::str::FromStr;

/// File loaded into the environment at startup when present.
pub const CONFIG_FILE: &str = "config.env";

/// Maintenance database used to issue `CREATE DATABASE`.
const ADMIN_DATABASE: &str = "postgres";

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseSettings {
    /// Options for the target database.
    pub fn connect_options(&self) -> PgConnectOptions {
        self.options_for(&self.name)
    }

    /// Options for the maintenance database on the same server.
    pub fn admin_options(&self) -> PgConnectOptions {
        self.options_for(ADMIN_DATABASE)
    }

    fn options_for(&self, database: &str) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(database)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database: DatabaseSettings,
    /// HTTP listen port.
    pub port: u16,
    /// Largest accepted request body in bytes.
    pub body_limit: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Settings {
            database: DatabaseSettings {
                host: get("DB_HOST", "localhost"),
                port: parse("DB_PORT", get("DB_PORT", "5432"))?,
                user: get("DB_USER", "postgres"),
                password: get("DB_PASSWORD", "password"),
                name: get("DB_NAME", "dev_tracker"),
                max_connections: parse("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS", "5"))?,
            },
            port: parse("PORT", get("PORT", "5000"))?,
            body_limit: parse("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES", "1048576"))?,
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
