use serde::Serialize;
use serde::de::DeserializeOwned;

use crm_core::CustomerDraft;

use crate::app::errors::ApiError;

// -------------------------
// Request parsing
// -------------------------

/// Decode a JSON request body regardless of `Content-Type`.
///
/// Any decode failure (syntax, wrong field type, empty body) is a 400.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// -------------------------
// Response bodies
// -------------------------

/// Echo of an update request. `id` is the path segment exactly as sent.
#[derive(Debug, Serialize)]
pub struct UpdatedCustomer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: String,
}

impl UpdatedCustomer {
    pub fn new(id: String, draft: CustomerDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            status: draft.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedCustomer {
    pub id: String,
    pub message: &'static str,
    pub status: &'static str,
}

impl DeletedCustomer {
    pub fn new(id: String) -> Self {
        Self {
            id,
            message: "customer deleted",
            status: "success",
        }
    }
}
