//! Customer persistence.
//!
//! [`CustomerStore`] is the only seam handlers talk to. The Postgres
//! implementation is used in production; the in-memory one mirrors its
//! observable behavior for tests and local runs.
//!
//! Ids arrive as raw path strings and are interpreted by the store, so a
//! non-numeric id is a store error rather than a routing error.

use async_trait::async_trait;
use thiserror::Error;

use crm_core::{Customer, CustomerDraft, DomainError};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryCustomerStore;
pub use postgres::PostgresCustomerStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("customer {0} not found")]
    NotFound(String),

    /// The id could not be interpreted as an integer.
    #[error("{0}")]
    InvalidId(String),

    #[error("database error: {0}")]
    Database(String),

    /// The store could not be reached (pool timeout/closed, I/O, poisoned lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn from_domain(err: DomainError, id: &str) -> Self {
        match err {
            DomainError::InvalidId(msg) => StoreError::InvalidId(msg),
            DomainError::NotFound => StoreError::NotFound(id.to_string()),
        }
    }
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// All customers ordered by `(id, name)` ascending.
    async fn list(&self) -> Result<Vec<Customer>, StoreError>;

    async fn get(&self, id: &str) -> Result<Customer, StoreError>;

    /// Insert a new row; the store assigns the id.
    async fn create(&self, draft: CustomerDraft) -> Result<Customer, StoreError>;

    /// Overwrite name/email/status of the row with `id`.
    ///
    /// Returns the number of rows affected; zero is not an error.
    async fn update(&self, id: &str, draft: &CustomerDraft) -> Result<u64, StoreError>;

    /// Returns the number of rows removed; zero is not an error.
    async fn delete(&self, id: &str) -> Result<u64, StoreError>;
}
