//! Database adapters: connection pool and schema bootstrap.

pub use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::instrument;

use crate::config::AppConfig;

/// Idempotent DDL for the only table the service owns.
pub const CREATE_CUSTOMERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    id SERIAL PRIMARY KEY,
    name TEXT,
    email TEXT,
    status TEXT
)
"#;

/// Startup failures. These are fatal: the service is useless without a
/// database or a schema.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("can't connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("can't create customers table: {0}")]
    Schema(#[source] sqlx::Error),
}

/// Build the connection pool and open its first connection.
///
/// Requests acquire pooled connections individually; nothing else holds one.
#[instrument(skip(config), fields(max_connections = config.max_connections), err)]
pub async fn connect(config: &AppConfig) -> Result<PgPool, DbError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.database_url)
        .await
        .map_err(DbError::Connect)
}

/// Ensure the `customers` table exists. Safe to run on every boot.
#[instrument(skip(pool), err)]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(CREATE_CUSTOMERS_TABLE)
        .execute(pool)
        .await
        .map_err(DbError::Schema)?;
    tracing::info!("customers table ready");
    Ok(())
}
