//! Persistence layer for the tally ledger.
//!
//! SQLite-backed: one database file, one pooled connection. The ledger
//! is a single process-wide handle and every operation runs to
//! completion on it before the next acquires it, so the only
//! serialization primitive is the database transaction itself.

pub mod migrations;
pub mod models;
pub mod repositories;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool from a database URL.
///
/// The pool is capped at one connection (see module docs). The
/// database file is created on first use and foreign keys are enforced
/// so client deletes cascade to dependents.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
