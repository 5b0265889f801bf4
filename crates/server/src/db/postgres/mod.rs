//! `PostgreSQL` record store.
//!
//! Each entity kind has a small repository borrowing the pool, in the same
//! shape as the rest of the data layer; [`PgStore`] stitches them together
//! behind the [`RecordStore`] trait.
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate builds
//! without a live database.

mod accounts;
mod customers;
mod orders;
mod products;

use async_trait::async_trait;
use sqlx::PgPool;

use customer_desk_core::{
    AccountId, Customer, CustomerAccount, CustomerAccountPatch, CustomerId, CustomerPatch,
    NewCustomer, NewCustomerAccount, NewOrder, NewProduct, Order, OrderId, OrderPatch, PricedLine,
    Product, ProductId, ProductPatch,
};

pub use accounts::AccountRepository;
pub use customers::CustomerRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;

use super::{RecordStore, RepositoryError};

/// Record store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool. The schema must already be migrated.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a failed `DELETE` to `Conflict` when rows still reference the target.
fn restrict_violation(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}

/// SQLSTATE `numeric_value_out_of_range`.
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Map a write rejected with `numeric_value_out_of_range` to `InvalidValue`.
fn out_of_range(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE)
    {
        return RepositoryError::InvalidValue(message.to_owned());
    }
    RepositoryError::Database(e)
}

#[async_trait]
impl RecordStore for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_customer(&self, new: NewCustomer) -> Result<Customer, RepositoryError> {
        CustomerRepository::new(&self.pool).create(&new).await
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        CustomerRepository::new(&self.pool).get_by_id(id).await
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, RepositoryError> {
        CustomerRepository::new(&self.pool).list().await
    }

    async fn update_customer(
        &self,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<Option<Customer>, RepositoryError> {
        CustomerRepository::new(&self.pool).update(id, &patch).await
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        CustomerRepository::new(&self.pool).delete(id).await
    }

    async fn create_account(
        &self,
        new: NewCustomerAccount,
    ) -> Result<CustomerAccount, RepositoryError> {
        AccountRepository::new(&self.pool).create(&new).await
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<CustomerAccount>, RepositoryError> {
        AccountRepository::new(&self.pool).get_by_id(id).await
    }

    async fn list_accounts(&self) -> Result<Vec<CustomerAccount>, RepositoryError> {
        AccountRepository::new(&self.pool).list().await
    }

    async fn update_account(
        &self,
        id: AccountId,
        patch: CustomerAccountPatch,
    ) -> Result<Option<CustomerAccount>, RepositoryError> {
        AccountRepository::new(&self.pool).update(id, &patch).await
    }

    async fn delete_account(&self, id: AccountId) -> Result<bool, RepositoryError> {
        AccountRepository::new(&self.pool).delete(id).await
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        ProductRepository::new(&self.pool).create(&new).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).get_by_id(id).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).list().await
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).update(id, &patch).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        ProductRepository::new(&self.pool).delete(id).await
    }

    async fn create_order(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        OrderRepository::new(&self.pool).create(&new).await
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        OrderRepository::new(&self.pool).get_by_id(id).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        OrderRepository::new(&self.pool).list().await
    }

    async fn update_order(
        &self,
        id: OrderId,
        patch: OrderPatch,
    ) -> Result<Option<Order>, RepositoryError> {
        OrderRepository::new(&self.pool).update(id, &patch).await
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool, RepositoryError> {
        OrderRepository::new(&self.pool).delete(id).await
    }

    async fn priced_lines(&self, id: OrderId) -> Result<Option<Vec<PricedLine>>, RepositoryError> {
        OrderRepository::new(&self.pool).priced_lines(id).await
    }
}
