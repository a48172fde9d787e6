use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crm_infra::StoreError;

/// Failures a handler can return. Each maps to exactly one envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body is not a valid customer payload.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => bad_request(msg),
            ApiError::Store(e) => {
                tracing::error!(error = %e, "customer store error");
                server_error(e.to_string())
            }
        }
    }
}

/// `{"error": <message>}` with 400.
pub fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({ "error": message.into() })),
    )
        .into_response()
}

/// `{"errorCode": 500, "errorDesc": <message>}` with 500.
pub fn server_error(message: impl Into<String>) -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    (
        status,
        axum::Json(json!({
            "errorCode": status.as_u16(),
            "errorDesc": message.into(),
        })),
    )
        .into_response()
}
