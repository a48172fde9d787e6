//! Infrastructure layer: configuration, Postgres wiring, customer storage.

pub mod config;
pub mod customer_store;
pub mod db;

pub use self::config::{AppConfig, ConfigError};
pub use customer_store::{CustomerStore, InMemoryCustomerStore, PostgresCustomerStore, StoreError};
pub use db::DbError;
