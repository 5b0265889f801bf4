//! Record store: persistence for the four entity kinds.
//!
//! Two backends implement [`RecordStore`]:
//!
//! - [`MemoryStore`] - process-local tables behind one mutex. Used when no
//!   database URL is configured, and by the test suites.
//! - [`PgStore`] - `PostgreSQL` tables, one per entity kind plus
//!   `order_lines`.
//!
//! Both assign IDs themselves, never reuse an ID, apply partial updates
//! field-by-field (last write wins), refuse to create rows that point at a
//! missing customer or product, and refuse to delete a customer or product
//! that other rows still reference.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p customer-desk-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use customer_desk_core::{
    AccountId, Customer, CustomerAccount, CustomerAccountPatch, CustomerId, CustomerPatch, Entity,
    NewCustomer, NewCustomerAccount, NewOrder, NewProduct, Order, OrderId, OrderPatch, PricedLine,
    Product, ProductId, ProductPatch,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// A row referenced by the input does not exist.
    #[error("referenced {0} does not exist")]
    MissingReference(Entity),

    /// Constraint violation (e.g., deleting a customer that still has orders).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A supplied value does not fit the column it is stored in.
    #[error("{0}")]
    InvalidValue(String),
}

/// Persistence contract shared by every store backend.
///
/// Lookups return `Ok(None)` when the ID has no row; deletes return `Ok(false)`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    // Customers

    async fn create_customer(&self, new: NewCustomer) -> Result<Customer, RepositoryError>;
    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;
    async fn list_customers(&self) -> Result<Vec<Customer>, RepositoryError>;
    async fn update_customer(
        &self,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<Option<Customer>, RepositoryError>;
    async fn delete_customer(&self, id: CustomerId) -> Result<bool, RepositoryError>;

    // Customer accounts

    async fn create_account(
        &self,
        new: NewCustomerAccount,
    ) -> Result<CustomerAccount, RepositoryError>;
    async fn get_account(&self, id: AccountId) -> Result<Option<CustomerAccount>, RepositoryError>;
    async fn list_accounts(&self) -> Result<Vec<CustomerAccount>, RepositoryError>;
    async fn update_account(
        &self,
        id: AccountId,
        patch: CustomerAccountPatch,
    ) -> Result<Option<CustomerAccount>, RepositoryError>;
    async fn delete_account(&self, id: AccountId) -> Result<bool, RepositoryError>;

    // Products

    async fn create_product(&self, new: NewProduct) -> Result<Product, RepositoryError>;
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, RepositoryError>;
    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError>;

    // Orders

    async fn create_order(&self, new: NewOrder) -> Result<Order, RepositoryError>;
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;
    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError>;
    async fn update_order(
        &self,
        id: OrderId,
        patch: OrderPatch,
    ) -> Result<Option<Order>, RepositoryError>;
    async fn delete_order(&self, id: OrderId) -> Result<bool, RepositoryError>;

    /// Lines of an order joined with their products' current prices.
    async fn priced_lines(&self, id: OrderId) -> Result<Option<Vec<PricedLine>>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
