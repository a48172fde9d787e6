use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crm_auth::CredentialValidator;

#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<dyn CredentialValidator>,
}

/// Rejects the request with 401 unless the `Authorization` header passes the
/// configured validator. Handlers never run for rejected requests.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    tracing::debug!(path = %req.uri().path(), "auth middleware start");

    if let Err(e) = state.validator.validate(extract_credential(req.headers())) {
        tracing::debug!(reason = %e, "request rejected");
        return unauthorized();
    }

    let res = next.run(req).await;
    tracing::debug!(status = %res.status(), "auth middleware end");
    res
}

/// Header value bytes as sent, including non-ASCII values.
fn extract_credential(headers: &HeaderMap) -> Option<&[u8]> {
    headers.get(AUTHORIZATION).map(|v| v.as_bytes())
}

/// 401 with the standard reason phrase as a JSON string body.
fn unauthorized() -> Response {
    let status = StatusCode::UNAUTHORIZED;
    let text = status.canonical_reason().unwrap_or("Unauthorized");
    (status, Json(text)).into_response()
}
