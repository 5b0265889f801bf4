//! Product route handlers, including the stock sub-resource.

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
    Entity, NewProduct, Product, ProductId, ProductPatch, StockLevel, StockUpdate,
    ensure_not_empty, require,
};

use crate::cache::CacheKey;
use crate::error::{AppError, Result};
use crate::extract::{JsonBody, RecordId};
use crate::state::AppState;

use super::MessageResponse;

const ENTITY: Entity = Entity::Product;

/// Write confirmation carrying the stored product.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub message: &'static str,
    pub product: Product,
}

/// Product routes, mounted at `/products`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show).put(update).delete(destroy))
        .route("/{id}/stock", get(stock).put(update_stock))
}

/// List all products.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Value>> {
    let store = state.store();
    let body = state
        .cache()
        .get_or_compute(CacheKey::List(ENTITY), || async move {
            let products = store.list_products().await?;
            Ok::<_, AppError>(serde_json::to_value(products)?)
        })
        .await?;

    Ok(Json(body))
}

/// Get one product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RecordId(id): RecordId<ProductId>,
) -> Result<Json<Value>> {
    let store = state.store();
    let body = state
        .cache()
        .get_or_compute(CacheKey::Record(ENTITY, id.as_i32()), || async move {
            let product = store
                .get_product(id)
                .await?
                .ok_or(AppError::NotFound(ENTITY))?;
            Ok::<_, AppError>(serde_json::to_value(product)?)
        })
        .await?;

    info!(product_id = %id, "Product retrieved");
    Ok(Json(body))
}

/// Create a product.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    require(&body.0, NewProduct::REQUIRED_FIELDS)?;
    let new: NewProduct = body.decode()?;

    let product = state.store().create_product(new).await?;
    state.cache().invalidate_list(ENTITY).await;

    info!(product_id = %product.id, "Product created");
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            message: "Product created successfully",
            product,
        }),
    ))
}

/// Update the supplied fields of a product.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId<ProductId>,
    body: JsonBody,
) -> Result<Json<ProductResponse>> {
    ensure_not_empty(&body.0)?;
    let patch: ProductPatch = body.decode()?;

    let product = apply_patch(&state, id, patch).await?;

    info!(product_id = %id, "Product updated");
    Ok(Json(ProductResponse {
        message: "Product updated successfully",
        product,
    }))
}

/// Delete a product that no order line references.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    RecordId(id): RecordId<ProductId>,
) -> Result<Json<MessageResponse>> {
    if !state.store().delete_product(id).await? {
        return Err(AppError::NotFound(ENTITY));
    }
    state.cache().invalidate_record(ENTITY, id.as_i32()).await;

    info!(product_id = %id, "Product deleted");
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

/// Current stock level of a product.
#[instrument(skip(state))]
pub async fn stock(
    State(state): State<AppState>,
    RecordId(id): RecordId<ProductId>,
) -> Result<Json<StockLevel>> {
    let product = state
        .store()
        .get_product(id)
        .await?
        .ok_or(AppError::NotFound(ENTITY))?;

    Ok(Json(StockLevel::from(&product)))
}

/// Overwrite the stock level of a product.
#[instrument(skip(state, body))]
pub async fn update_stock(
    State(state): State<AppState>,
    RecordId(id): RecordId<ProductId>,
    body: JsonBody,
) -> Result<Json<MessageResponse>> {
    require(&body.0, StockUpdate::REQUIRED_FIELDS)?;
    let update: StockUpdate = body.decode()?;

    apply_patch(&state, id, ProductPatch::stock(update.stock_level)).await?;

    info!(product_id = %id, stock_level = update.stock_level, "Stock level updated");
    Ok(Json(MessageResponse::new("Stock level updated successfully")))
}

async fn apply_patch(state: &AppState, id: ProductId, patch: ProductPatch) -> Result<Product> {
    let product = state
        .store()
        .update_product(id, patch)
        .await?
        .ok_or(AppError::NotFound(ENTITY))?;
    state.cache().invalidate_record(ENTITY, id.as_i32()).await;
    Ok(product)
}
