//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Customers
//! GET    /customers                  - List customers (cached)
//! POST   /customers                  - Create customer
//! GET    /customers/{id}             - Get customer (cached)
//! PUT    /customers/{id}             - Update customer
//! DELETE /customers/{id}             - Delete customer
//!
//! # Customer accounts (password hashed, never returned)
//! GET    /customer_accounts          - List accounts (cached)
//! POST   /customer_accounts          - Create account
//! GET    /customer_accounts/{id}     - Get account (cached)
//! PUT    /customer_accounts/{id}     - Update account
//! DELETE /customer_accounts/{id}     - Delete account
//!
//! # Products
//! GET    /products                   - List products (cached)
//! POST   /products                   - Create product
//! GET    /products/{id}              - Get product (cached)
//! PUT    /products/{id}              - Update product
//! DELETE /products/{id}              - Delete product
//! GET    /products/{id}/stock        - Get stock level
//! PUT    /products/{id}/stock        - Set stock level
//!
//! # Orders
//! GET    /orders                     - List orders
//! POST   /orders                     - Create order
//! GET    /orders/{id}                - Get order
//! PUT    /orders/{id}                - Update status and/or lines
//! DELETE /orders/{id}                - Delete order
//! GET    /orders/{id}/total          - Sum of unit price * quantity
//! ```
//!
//! Writes answer `{"message": ..., "<kind>": {...}}`; reads answer the bare
//! record or list.

pub mod accounts;
pub mod customers;
pub mod orders;
pub mod products;

use axum::Router;
use serde::Serialize;

use customer_desk_core::Entity;

use crate::state::AppState;

/// Body of responses that carry only a confirmation.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Build the resource router, one collection per entity kind.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest(&mount(Entity::Customer), customers::router())
        .nest(&mount(Entity::CustomerAccount), accounts::router())
        .nest(&mount(Entity::Product), products::router())
        .nest(&mount(Entity::Order), orders::router())
}

fn mount(entity: Entity) -> String {
    format!("/{}", entity.collection())
}
