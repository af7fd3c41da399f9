//! Database and table provisioning. Idempotent; run on every start before serving.

use crate::error::StoreError;
use crate::records::TABLES;
use crate::settings::DatabaseSettings;
use crate::sql::quoted;
use sqlx::{ConnectOptions, PgPool};

/// SQLSTATE for `CREATE DATABASE` on a name that already exists.
const DUPLICATE_DATABASE: &str = "42P04";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseStatus {
    Created,
    AlreadyExists,
    /// Creation failed for another reason; startup continues and the pool connect decides.
    Unverified,
}

/// Create the target database through the `postgres` maintenance database if it is missing.
/// Never fails: anything other than "already exists" is logged as a warning.
pub async fn ensure_database_exists(settings: &DatabaseSettings) -> DatabaseStatus {
    if settings.name.is_empty() || settings.name == "postgres" {
        return DatabaseStatus::AlreadyExists;
    }
    let status = match create_database(settings).await {
        Ok(true) => DatabaseStatus::Created,
        Ok(false) => DatabaseStatus::AlreadyExists,
        Err(e) if is_duplicate_database(&e) => DatabaseStatus::AlreadyExists,
        Err(e) => {
            tracing::warn!(database = %settings.name, error = %e, "could not create database");
            DatabaseStatus::Unverified
        }
    };
    match status {
        DatabaseStatus::Created => tracing::info!(database = %settings.name, "database created"),
        DatabaseStatus::AlreadyExists => tracing::info!(database = %settings.name, "database already exists"),
        DatabaseStatus::Unverified => {}
    }
    status
}

async fn create_database(settings: &DatabaseSettings) -> Result<bool, sqlx::Error> {
    let mut conn = settings.admin_options().connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&settings.name)
        .fetch_one(&mut conn)
        .await?;
    if exists.0 {
        return Ok(false);
    }
    sqlx::query(&format!("CREATE DATABASE {}", quoted(&settings.name)))
        .execute(&mut conn)
        .await?;
    Ok(true)
}

fn is_duplicate_database(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(DUPLICATE_DATABASE),
        _ => false,
    }
}

/// `CREATE TABLE IF NOT EXISTS` for every record table. Any failure aborts.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), StoreError> {
    for schema in TABLES {
        sqlx::query(schema.ddl).execute(pool).await?;
        tracing::info!(table = schema.table, "table ready");
    }
    Ok(())
}
