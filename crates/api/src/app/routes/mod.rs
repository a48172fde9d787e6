use axum::Router;

pub mod customers;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new().nest("/customers", customers::router())
}
