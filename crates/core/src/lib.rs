//! `crm-core` — customer domain building blocks.
//!
//! This crate contains **pure domain** types (no infrastructure concerns).

pub mod customer;
pub mod entity;
pub mod error;
pub mod id;

pub use customer::{Customer, CustomerDraft};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::CustomerId;
