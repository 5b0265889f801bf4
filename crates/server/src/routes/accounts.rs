//! Customer account route handlers.
//!
//! Plain-text passwords are hashed before they reach the store. Responses are
//! built from [`CustomerAccount`], whose serialization skips the hash.

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
    AccountId, CreateAccount, CustomerAccount, CustomerAccountPatch, Entity, NewCustomerAccount,
    UpdateAccount, ensure_not_empty, require,
};

use crate::cache::CacheKey;
use crate::error::{AppError, Result};
use crate::extract::{JsonBody, RecordId};
use crate::services::credentials::hash_password_blocking;
use crate::state::AppState;

use super::MessageResponse;

const ENTITY: Entity = Entity::CustomerAccount;

/// Write confirmation carrying the stored account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub message: &'static str,
    pub account: CustomerAccount,
}

/// Account routes, mounted at `/customer_accounts`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show).put(update).delete(destroy))
}

#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Value>> {
    let store = state.store();
    let body = state
        .cache()
        .get_or_compute(CacheKey::List(ENTITY), || async move {
            let accounts = store.list_accounts().await?;
            Ok::<_, AppError>(serde_json::to_value(accounts)?)
        })
        .await?;

    Ok(Json(body))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RecordId(id): RecordId<AccountId>,
) -> Result<Json<Value>> {
    let store = state.store();
    let body = state
        .cache()
        .get_or_compute(CacheKey::Record(ENTITY, id.as_i32()), || async move {
            let account = store
                .get_account(id)
                .await?
                .ok_or(AppError::NotFound(ENTITY))?;
            Ok::<_, AppError>(serde_json::to_value(account)?)
        })
        .await?;

    info!(account_id = %id, "Customer account retrieved");
    Ok(Json(body))
}

/// Create an account for an existing customer.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<AccountResponse>)> {
    require(&body.0, CreateAccount::REQUIRED_FIELDS)?;
    let input: CreateAccount = body.decode()?;

    let password_hash = hash_password_blocking(input.password).await?;
    let account = state
        .store()
        .create_account(NewCustomerAccount {
            customer_id: input.customer_id,
            username: input.username,
            password_hash,
        })
        .await?;
    state.cache().invalidate_list(ENTITY).await;

    info!(account_id = %account.id, customer_id = %account.customer_id, "Customer account created");
    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            message: "Customer account created successfully",
            account,
        }),
    ))
}

/// Change the username and/or password of an account.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    RecordId(id): RecordId<AccountId>,
    body: JsonBody,
) -> Result<Json<AccountResponse>> {
    ensure_not_empty(&body.0)?;
    let input: UpdateAccount = body.decode()?;

    let password_hash = match input.password {
        Some(password) => Some(hash_password_blocking(password).await?),
        None => None,
    };
    let patch = CustomerAccountPatch {
        username: input.username,
        password_hash,
    };

    let account = state
        .store()
        .update_account(id, patch)
        .await?
        .ok_or(AppError::NotFound(ENTITY))?;
    state.cache().invalidate_record(ENTITY, id.as_i32()).await;

    info!(account_id = %id, "Customer account updated");
    Ok(Json(AccountResponse {
        message: "Customer account updated successfully",
        account,
    }))
}

#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    RecordId(id): RecordId<AccountId>,
) -> Result<Json<MessageResponse>> {
    if !state.store().delete_account(id).await? {
        return Err(AppError::NotFound(ENTITY));
    }
    state.cache().invalidate_record(ENTITY, id.as_i32()).await;

    info!(account_id = %id, "Customer account deleted");
    Ok(Json(MessageResponse::new(
        "Customer account deleted successfully",
    )))
}
