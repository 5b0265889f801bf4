//! Store wrappers that shape timing for concurrency tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use customer_desk_core::{
    AccountId, Customer, CustomerAccount, CustomerAccountPatch, CustomerId, CustomerPatch,
    NewCustomer, NewCustomerAccount, NewOrder, NewProduct, Order, OrderId, OrderPatch, PricedLine,
    Product, ProductId, ProductPatch,
};
use customer_desk_server::db::{MemoryStore, RecordStore, RepositoryError};

/// In-memory store whose first product listing reads its snapshot and then
/// stalls for `delay` before returning it.
///
/// A write issued during the stall commits and returns while the listing
/// still holds the rows it read before that write.
pub struct StalledListStore {
    inner: MemoryStore,
    delay: Duration,
    stalled: AtomicBool,
}

impl StalledListStore {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            delay,
            stalled: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl RecordStore for StalledListStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.inner.ping().await
    }

    async fn create_customer(&self, new: NewCustomer) -> Result<Customer, RepositoryError> {
        self.inner.create_customer(new).await
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        self.inner.get_customer(id).await
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, RepositoryError> {
        self.inner.list_customers().await
    }

    async fn update_customer(
        &self,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<Option<Customer>, RepositoryError> {
        self.inner.update_customer(id, patch).await
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        self.inner.delete_customer(id).await
    }

    async fn create_account(
        &self,
        new: NewCustomerAccount,
    ) -> Result<CustomerAccount, RepositoryError> {
        self.inner.create_account(new).await
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<CustomerAccount>, RepositoryError> {
        self.inner.get_account(id).await
    }

    async fn list_accounts(&self) -> Result<Vec<CustomerAccount>, RepositoryError> {
        self.inner.list_accounts().await
    }

    async fn update_account(
        &self,
        id: AccountId,
        patch: CustomerAccountPatch,
    ) -> Result<Option<CustomerAccount>, RepositoryError> {
        self.inner.update_account(id, patch).await
    }

    async fn delete_account(&self, id: AccountId) -> Result<bool, RepositoryError> {
        self.inner.delete_account(id).await
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        self.inner.create_product(new).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        self.inner.get_product(id).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self.inner.list_products().await?;
        if !self.stalled.swap(true, Ordering::SeqCst) {
            tokio::time::sleep(self.delay).await;
        }
        Ok(products)
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, RepositoryError> {
        self.inner.update_product(id, patch).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        self.inner.delete_product(id).await
    }

    async fn create_order(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        self.inner.create_order(new).await
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        self.inner.get_order(id).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        self.inner.list_orders().await
    }

    async fn update_order(
        &self,
        id: OrderId,
        patch: OrderPatch,
    ) -> Result<Option<Order>, RepositoryError> {
        self.inner.update_order(id, patch).await
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool, RepositoryError> {
        self.inner.delete_order(id).await
    }

    async fn priced_lines(&self, id: OrderId) -> Result<Option<Vec<PricedLine>>, RepositoryError> {
        self.inner.priced_lines(id).await
    }
}
