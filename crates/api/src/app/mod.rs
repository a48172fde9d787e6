//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: which customer store backs the handlers
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request parsing and response bodies
//! - `errors.rs`: error envelopes

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crm_auth::CredentialValidator;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
///
/// Every route sits behind the auth middleware; there are no public routes.
pub fn build_app(services: services::AppServices, validator: Arc<dyn CredentialValidator>) -> Router {
    let auth_state = middleware::AuthState { validator };

    routes::router()
        .layer(Extension(Arc::new(services)))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
