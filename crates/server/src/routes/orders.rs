//! Order route handlers.
//!
//! Orders are read straight from the store: their totals depend on current
//! product prices, so caching them would serve stale sums.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument};

use customer_desk_core::{
    CreateOrder, Entity, Order, OrderId, OrderPatch, ensure_not_empty, order_total, require,
};

use crate::error::{AppError, Result};
use crate::extract::{JsonBody, RecordId};
use crate::state::AppState;

use super::MessageResponse;

const ENTITY: Entity = Entity::Order;

/// Write confirmation carrying the stored order.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub message: &'static str,
    pub order: Order,
}

/// Body of `GET /orders/{id}/total`.
#[derive(Debug, Serialize)]
pub struct OrderTotal {
    pub order_id: OrderId,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_price: Decimal,
}

/// Order routes, mounted at `/orders`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show).put(update).delete(destroy))
        .route("/{id}/total", get(total))
}

#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    let orders = state.store().list_orders().await?;
    Ok(Json(orders))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RecordId(id): RecordId<OrderId>,
) -> Result<Json<Order>> {
    let order = state
        .store()
        .get_order(id)
        .await?
        .ok_or(AppError::NotFound(ENTITY))?;

    info!(order_id = %id, "Order retrieved");
    Ok(Json(order))
}

/// Create an order from a `lines` array or a single `product_id`/`quantity`.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    require(&body.0, CreateOrder::REQUIRED_FIELDS)?;
    if !body.0.contains_key("lines") {
        require(&body.0, CreateOrder::SINGLE_LINE_FIELDS)?;
    }
    let input: CreateOrder = body.decode()?;
    let new = input.into_new_order(Utc::now())?;

    let order = state.store().create_order(new).await?;

    info!(
        order_id = %order.id,
        customer_id = %order.customer_id,
        lines = order.lines.len(),
        "Order created"
    );
    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            message: "Order created successfully",
            order,
        }),
    ))
}

/// Change the status and/or replace the lines of an order.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId<OrderId>,
    body: JsonBody,
) -> Result<Json<OrderResponse>> {
    ensure_not_empty(&body.0)?;
    let patch: OrderPatch = body.decode()?;

    let order = state
        .store()
        .update_order(id, patch)
        .await?
        .ok_or(AppError::NotFound(ENTITY))?;

    info!(order_id = %id, "Order updated");
    Ok(Json(OrderResponse {
        message: "Order updated successfully",
        order,
    }))
}

#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    RecordId(id): RecordId<OrderId>,
) -> Result<Json<MessageResponse>> {
    if !state.store().delete_order(id).await? {
        return Err(AppError::NotFound(ENTITY));
    }

    info!(order_id = %id, "Order deleted");
    Ok(Json(MessageResponse::new("Order deleted successfully")))
}

/// Sum of `unit_price * quantity` over the order's lines, at current prices.
#[instrument(skip(state))]
pub async fn total(
    State(state): State<AppState>,
    RecordId(id): RecordId<OrderId>,
) -> Result<Json<OrderTotal>> {
    let lines = state
        .store()
        .priced_lines(id)
        .await?
        .ok_or(AppError::NotFound(ENTITY))?;
    let total_price = order_total(&lines).ok_or_else(|| {
        AppError::Unprocessable("Order total exceeds the supported price range".to_owned())
    })?;

    info!(order_id = %id, total = %total_price, "Order total computed");
    Ok(Json(OrderTotal {
        order_id: id,
        total_price,
    }))
}
