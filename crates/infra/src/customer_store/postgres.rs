//! Postgres-backed customer store.
//!
//! Every operation acquires its own pooled connection and releases it when the
//! guard drops, on success and error paths alike. Statements are bound
//! parameters (`$n`), so sqlx prepares and caches them per connection.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database | `22P02` | `InvalidId` | Path id is not an integer |
//! | Database | `22003` | `InvalidId` | Path id overflows `int4` |
//! | Database (other) | Any other | `Database` | Constraint, syntax, missing table |
//! | PoolTimedOut / PoolClosed / Io / Tls | N/A | `Unavailable` | Database unreachable |
//! | Other | N/A | `Database` | Decode failures etc. |

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row};
use tracing::instrument;

use crm_core::{Customer, CustomerDraft, CustomerId};

use super::{CustomerStore, StoreError};

const LIST_SQL: &str = "SELECT id, name, email, status FROM customers ORDER BY id, name ASC";
const GET_SQL: &str = "SELECT id, name, email, status FROM customers WHERE id = $1::int4";
const INSERT_SQL: &str = "INSERT INTO customers (name, email, status) VALUES ($1, $2, $3) RETURNING id";
const UPDATE_SQL: &str = "UPDATE customers SET name = $2, email = $3, status = $4 WHERE id = $1::int4";
const DELETE_SQL: &str = "DELETE FROM customers WHERE id = $1::int4";

#[derive(Debug, Clone)]
pub struct PostgresCustomerStore {
    pool: PgPool,
}

impl PostgresCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn acquire(&self, operation: &str) -> Result<PoolConnection<Postgres>, StoreError> {
        self.pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error(operation, e))
    }
}

#[async_trait]
impl CustomerStore for PostgresCustomerStore {
    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        let mut conn = self.acquire("list_customers").await?;
        let rows = sqlx::query(LIST_SQL)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("list_customers", e))?;

        rows.iter()
            .map(|row| customer_from_row(row).map_err(|e| map_sqlx_error("list_customers", e)))
            .collect()
    }

    #[instrument(skip(self), err)]
    async fn get(&self, id: &str) -> Result<Customer, StoreError> {
        let mut conn = self.acquire("get_customer").await?;
        let row = sqlx::query(GET_SQL)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("get_customer", e))?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        customer_from_row(&row).map_err(|e| map_sqlx_error("get_customer", e))
    }

    #[instrument(skip(self, draft), err)]
    async fn create(&self, draft: CustomerDraft) -> Result<Customer, StoreError> {
        let mut conn = self.acquire("create_customer").await?;
        let id: i32 = sqlx::query(INSERT_SQL)
            .bind(&draft.name)
            .bind(&draft.email)
            .bind(&draft.status)
            .fetch_one(&mut *conn)
            .await
            .and_then(|row| row.try_get("id"))
            .map_err(|e| map_sqlx_error("create_customer", e))?;

        Ok(Customer::from_draft(CustomerId::new(id), draft))
    }

    #[instrument(skip(self, draft), err)]
    async fn update(&self, id: &str, draft: &CustomerDraft) -> Result<u64, StoreError> {
        let mut conn = self.acquire("update_customer").await?;
        let result = sqlx::query(UPDATE_SQL)
            .bind(id)
            .bind(&draft.name)
            .bind(&draft.email)
            .bind(&draft.status)
            .execute(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("update_customer", e))?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        let mut conn = self.acquire("delete_customer").await?;
        let result = sqlx::query(DELETE_SQL)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("delete_customer", e))?;
        Ok(result.rows_affected())
    }
}

/// Columns are nullable; NULL reads back as an empty string.
fn customer_from_row(row: &PgRow) -> Result<Customer, sqlx::Error> {
    Ok(Customer {
        id: CustomerId::new(row.try_get("id")?),
        name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
        email: row.try_get::<Option<String>, _>("email")?.unwrap_or_default(),
        status: row.try_get::<Option<String>, _>("status")?.unwrap_or_default(),
    })
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("22P02") | Some("22003") => StoreError::InvalidId(db_err.message().to_string()),
            _ => StoreError::Database(format!("{} failed: {}", operation, db_err.message())),
        },
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring connection for {}", operation))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("i/o error in {}: {}", operation, e)),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("tls error in {}: {}", operation, e)),
        other => StoreError::Database(format!("{} failed: {}", operation, other)),
    }
}
