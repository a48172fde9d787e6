use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Extension, Path},
    http::StatusCode,
    routing::get,
};

use crm_core::{Customer, CustomerDraft};

use crate::app::dto::{self, DeletedCustomer, UpdatedCustomer};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = services.customers.list().await?;
    tracing::info!(count = customers.len(), "listed customers");
    Ok(Json(customers))
}

/// `id` goes to the store unvalidated; a non-numeric or unknown id is a 500.
pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let customer = services.customers.get(&id).await?;
    tracing::info!(id = %customer.id, name = %customer.name, "fetched customer");
    Ok(Json(customer))
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let draft: CustomerDraft = dto::parse_json(&body)?;
    let created = services.customers.create(draft).await?;
    tracing::info!(id = %created.id, "created customer");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Responds 200 with the submitted fields even when no row matched.
pub async fn update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<UpdatedCustomer>, ApiError> {
    let draft: CustomerDraft = dto::parse_json(&body)?;
    let affected = services.customers.update(&id, &draft).await?;
    tracing::info!(%id, affected, "updated customer");
    Ok(Json(UpdatedCustomer::new(id, draft)))
}

/// Responds 200 even when no row matched.
pub async fn delete_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedCustomer>, ApiError> {
    let affected = services.customers.delete(&id).await?;
    tracing::info!(%id, affected, "deleted customer");
    Ok(Json(DeletedCustomer::new(id)))
}
