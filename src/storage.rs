//! `PostgreSQL` connection pooling and schema bootstrap.
//!
//! Every context's Postgres adapter takes the same r2d2 pool type, so one
//! pool built here can back the identity, catalog, and gira stores.

use crate::config::DatabaseSettings;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;
use tracing::info;

/// Shared `PostgreSQL` connection pool.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Full schema for a fresh database.
pub const SCHEMA_SQL: &str =
    include_str!("../migrations/2026-10-19-000000_create_terreiro_tables/up.sql");

/// Errors raised while connecting or preparing the schema.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No connection URL was configured.
    #[error("database.url must be set (or TERREIRO_DATABASE_URL)")]
    MissingUrl,

    /// The pool could not be built or a connection checked out.
    #[error("failed to connect to PostgreSQL: {0}")]
    Pool(#[from] PoolError),

    /// Applying the schema failed.
    #[error("failed to apply schema: {0}")]
    Schema(#[from] diesel::result::Error),
}

/// Builds a connection pool from `settings`.
///
/// # Errors
///
/// Returns [`StorageError::MissingUrl`] when no URL is configured and
/// [`StorageError::Pool`] when the first connection cannot be opened.
pub fn connect(settings: &DatabaseSettings) -> Result<PgPool, StorageError> {
    let url = settings.url.as_deref().ok_or(StorageError::MissingUrl)?;
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = Pool::builder()
        .max_size(settings.pool_size)
        .build(manager)?;
    info!(pool_size = settings.pool_size, "connected to PostgreSQL");
    Ok(pool)
}

/// Creates any missing Terreiro tables and indexes.
///
/// Every statement in [`SCHEMA_SQL`] is guarded with `IF NOT EXISTS`, so
/// re-running against a prepared database is a no-op.
///
/// # Errors
///
/// Returns [`StorageError`] when no connection is available or a statement
/// fails.
pub fn apply_schema(pool: &PgPool) -> Result<(), StorageError> {
    let mut connection = pool.get()?;
    connection.batch_execute(SCHEMA_SQL)?;
    info!("applied terreiro schema");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn connect_requires_a_url() {
        let settings = DatabaseSettings::default();
        assert!(matches!(connect(&settings), Err(StorageError::MissingUrl)));
    }

    #[rstest]
    fn schema_creates_every_table() {
        for table in ["user_accounts", "practitioners", "giras", "queue_entries"] {
            assert!(
                SCHEMA_SQL.contains(&format!("CREATE TABLE IF NOT EXISTS {table} ")),
                "schema is missing {table}"
            );
        }
    }
}
