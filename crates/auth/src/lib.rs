//! `crm-auth` — credential validation boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: the API layer
//! extracts the raw credential and asks a [`CredentialValidator`] for a verdict.

pub mod credential;
pub mod static_token;

pub use credential::{AuthError, CredentialValidator};
pub use static_token::{StaticTokenValidator, DEFAULT_TOKEN};
