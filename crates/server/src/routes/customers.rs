//! Customer route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use customer_desk_core::{
    Customer, CustomerId, CustomerPatch, Entity, NewCustomer, ensure_not_empty, require,
};

use crate::cache::CacheKey;
use crate::error::{AppError, Result};
use crate::extract::{JsonBody, RecordId};
use crate::state::AppState;

use super::MessageResponse;

const ENTITY: Entity = Entity::Customer;

/// Write confirmation carrying the stored customer.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub message: &'static str,
    pub customer: Customer,
}

/// Customer routes, mounted at `/customers`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show).put(update).delete(destroy))
}

/// List all customers.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Value>> {
    let store = state.store();
    let body = state
        .cache()
        .get_or_compute(CacheKey::List(ENTITY), || async move {
            let customers = store.list_customers().await?;
            Ok::<_, AppError>(serde_json::to_value(customers)?)
        })
        .await?;

    Ok(Json(body))
}

/// Get one customer.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RecordId(id): RecordId<CustomerId>,
) -> Result<Json<Value>> {
    let store = state.store();
    let body = state
        .cache()
        .get_or_compute(CacheKey::Record(ENTITY, id.as_i32()), || async move {
            let customer = store
                .get_customer(id)
                .await?
                .ok_or(AppError::NotFound(ENTITY))?;
            Ok::<_, AppError>(serde_json::to_value(customer)?)
        })
        .await?;

    info!(customer_id = %id, "Customer retrieved");
    Ok(Json(body))
}

/// Create a customer.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<CustomerResponse>)> {
    require(&body.0, NewCustomer::REQUIRED_FIELDS)?;
    let new: NewCustomer = body.decode()?;

    let customer = state.store().create_customer(new).await?;
    state.cache().invalidate_list(ENTITY).await;

    info!(customer_id = %customer.id, "Customer created");
    Ok((
        StatusCode::CREATED,
        Json(CustomerResponse {
            message: "Customer created successfully",
            customer,
        }),
    ))
}

/// Update the supplied fields of a customer.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId<CustomerId>,
    body: JsonBody,
) -> Result<Json<CustomerResponse>> {
    ensure_not_empty(&body.0)?;
    let patch: CustomerPatch = body.decode()?;

    let customer = state
        .store()
        .update_customer(id, patch)
        .await?
        .ok_or(AppError::NotFound(ENTITY))?;
    state.cache().invalidate_record(ENTITY, id.as_i32()).await;

    info!(customer_id = %id, "Customer updated");
    Ok(Json(CustomerResponse {
        message: "Customer updated successfully",
        customer,
    }))
}

/// Delete a customer that no account or order references.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    RecordId(id): RecordId<CustomerId>,
) -> Result<Json<MessageResponse>> {
    if !state.store().delete_customer(id).await? {
        return Err(AppError::NotFound(ENTITY));
    }
    state.cache().invalidate_record(ENTITY, id.as_i32()).await;

    info!(customer_id = %id, "Customer deleted");
    Ok(Json(MessageResponse::new("Customer deleted successfully")))
}
