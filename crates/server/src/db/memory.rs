//! In-memory record store.
//!
//! All four tables live behind a single `tokio::sync::Mutex`, so every store
//! operation, including cross-table reference checks, is atomic with respect
//! to concurrent requests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use customer_desk_core::{
    AccountId, Customer, CustomerAccount, CustomerAccountPatch, CustomerId, CustomerPatch, Entity,
    NewCustomer, NewCustomerAccount, NewOrder, NewProduct, Order, OrderId, OrderLine, OrderPatch,
    PricedLine, Product, ProductId, ProductPatch,
};

use super::{RecordStore, RepositoryError};

/// Rows of one kind keyed by ID, with a monotonically increasing ID counter.
#[derive(Debug)]
struct Table<K, V> {
    last_id: i32,
    rows: BTreeMap<K, V>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<K, V> Table<K, V>
where
    K: Ord + Copy + From<i32>,
    V: Clone,
{
    /// Assign the next ID and store the row built from it.
    fn insert_with(&mut self, build: impl FnOnce(K) -> V) -> V {
        self.last_id += 1;
        let id = K::from(self.last_id);
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: K) -> Option<V> {
        self.rows.get(&id).cloned()
    }

    fn contains(&self, id: K) -> bool {
        self.rows.contains_key(&id)
    }

    fn list(&self) -> Vec<V> {
        self.rows.values().cloned().collect()
    }

    fn update_with(&mut self, id: K, apply: impl FnOnce(&mut V)) -> Option<V> {
        let row = self.rows.get_mut(&id)?;
        apply(row);
        Some(row.clone())
    }

    fn remove(&mut self, id: K) -> bool {
        self.rows.remove(&id).is_some()
    }
}

#[derive(Debug, Default)]
struct Tables {
    customers: Table<CustomerId, Customer>,
    accounts: Table<AccountId, CustomerAccount>,
    products: Table<ProductId, Product>,
    orders: Table<OrderId, Order>,
}

impl Tables {
    fn ensure_customer(&self, id: CustomerId) -> Result<(), RepositoryError> {
        if self.customers.contains(id) {
            Ok(())
        } else {
            Err(RepositoryError::MissingReference(Entity::Customer))
        }
    }

    fn ensure_products(&self, lines: &[OrderLine]) -> Result<(), RepositoryError> {
        if lines.iter().all(|line| self.products.contains(line.product_id)) {
            Ok(())
        } else {
            Err(RepositoryError::MissingReference(Entity::Product))
        }
    }
}

/// Record store holding every row in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty store. IDs for every kind start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn create_customer(&self, new: NewCustomer) -> Result<Customer, RepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.customers.insert_with(|id| new.with_id(id)))
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.tables.lock().await.customers.get(id))
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, RepositoryError> {
        Ok(self.tables.lock().await.customers.list())
    }

    async fn update_customer(
        &self,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<Option<Customer>, RepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .customers
            .update_with(id, |customer| patch.apply_to(customer)))
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.lock().await;
        if !tables.customers.contains(id) {
            return Ok(false);
        }

        let referenced = tables
            .accounts
            .rows
            .values()
            .any(|account| account.customer_id == id)
            || tables
                .orders
                .rows
                .values()
                .any(|order| order.customer_id == id);
        if referenced {
            return Err(RepositoryError::Conflict(
                "customer still has accounts or orders".to_owned(),
            ));
        }

        Ok(tables.customers.remove(id))
    }

    async fn create_account(
        &self,
        new: NewCustomerAccount,
    ) -> Result<CustomerAccount, RepositoryError> {
        let mut tables = self.tables.lock().await;
        tables.ensure_customer(new.customer_id)?;
        Ok(tables.accounts.insert_with(|id| new.with_id(id)))
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<CustomerAccount>, RepositoryError> {
        Ok(self.tables.lock().await.accounts.get(id))
    }

    async fn list_accounts(&self) -> Result<Vec<CustomerAccount>, RepositoryError> {
        Ok(self.tables.lock().await.accounts.list())
    }

    async fn update_account(
        &self,
        id: AccountId,
        patch: CustomerAccountPatch,
    ) -> Result<Option<CustomerAccount>, RepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .accounts
            .update_with(id, |account| patch.apply_to(account)))
    }

    async fn delete_account(&self, id: AccountId) -> Result<bool, RepositoryError> {
        Ok(self.tables.lock().await.accounts.remove(id))
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.products.insert_with(|id| new.with_id(id)))
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.tables.lock().await.products.get(id))
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.tables.lock().await.products.list())
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .products
            .update_with(id, |product| patch.apply_to(product)))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.lock().await;
        if !tables.products.contains(id) {
            return Ok(false);
        }

        let referenced = tables
            .orders
            .rows
            .values()
            .flat_map(|order| &order.lines)
            .any(|line| line.product_id == id);
        if referenced {
            return Err(RepositoryError::Conflict(
                "product is referenced by existing orders".to_owned(),
            ));
        }

        Ok(tables.products.remove(id))
    }

    async fn create_order(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        let mut tables = self.tables.lock().await;
        tables.ensure_customer(new.customer_id)?;
        tables.ensure_products(&new.lines)?;
        Ok(tables.orders.insert_with(|id| new.with_id(id)))
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.tables.lock().await.orders.get(id))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(self.tables.lock().await.orders.list())
    }

    async fn update_order(
        &self,
        id: OrderId,
        patch: OrderPatch,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut tables = self.tables.lock().await;
        if !tables.orders.contains(id) {
            return Ok(None);
        }
        if let Some(lines) = &patch.lines {
            tables.ensure_products(lines)?;
        }
        Ok(tables.orders.update_with(id, |order| patch.apply_to(order)))
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool, RepositoryError> {
        Ok(self.tables.lock().await.orders.remove(id))
    }

    async fn priced_lines(&self, id: OrderId) -> Result<Option<Vec<PricedLine>>, RepositoryError> {
        let tables = self.tables.lock().await;
        let Some(order) = tables.orders.rows.get(&id) else {
            return Ok(None);
        };

        order
            .lines
            .iter()
            .map(|line| {
                let product = tables.products.rows.get(&line.product_id).ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "order {id} references missing product {}",
                        line.product_id
                    ))
                })?;
                Ok(PricedLine::new(product.price, line.quantity))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use customer_desk_core::{OrderStatus, order_total};
    use rust_decimal::Decimal;

    use super::*;

    fn new_customer(name: &str) -> NewCustomer {
        NewCustomer {
            name: name.into(),
            email: format!("{name}@example.com"),
            phone_number: "555-0100".into(),
        }
    }

    fn new_product(price: Decimal) -> NewProduct {
        NewProduct {
            name: "Widget".into(),
            description: None,
            price,
            stock_level: 10,
        }
    }

    fn new_order(customer_id: CustomerId, lines: Vec<OrderLine>) -> NewOrder {
        NewOrder {
            customer_id,
            status: OrderStatus::default(),
            order_date: Utc::now(),
            lines,
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_never_reused() {
        let store = MemoryStore::new();

        let first = store.create_customer(new_customer("ann")).await.unwrap();
        let second = store.create_customer(new_customer("bob")).await.unwrap();
        assert_eq!(first.id, CustomerId::new(1));
        assert_eq!(second.id, CustomerId::new(2));

        assert!(store.delete_customer(second.id).await.unwrap());
        let third = store.create_customer(new_customer("cy")).await.unwrap();
        assert_eq!(third.id, CustomerId::new(3));
    }

    #[tokio::test]
    async fn test_each_kind_has_its_own_sequence() {
        let store = MemoryStore::new();
        store.create_customer(new_customer("ann")).await.unwrap();
        let product = store.create_product(new_product(Decimal::ONE)).await.unwrap();
        assert_eq!(product.id, ProductId::new(1));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_ids() {
        let store = MemoryStore::new();
        let missing = CustomerId::new(42);

        assert!(store.get_customer(missing).await.unwrap().is_none());
        assert!(
            store
                .update_customer(missing, CustomerPatch::default())
                .await
                .unwrap()
                .is_none()
        );
        assert!(!store.delete_customer(missing).await.unwrap());
    }

    #[tokio::test]
    async fn test_account_requires_existing_customer() {
        let store = MemoryStore::new();
        let err = store
            .create_account(NewCustomerAccount {
                customer_id: CustomerId::new(9),
                username: "ghost".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::MissingReference(Entity::Customer)
        ));
    }

    #[tokio::test]
    async fn test_referenced_rows_cannot_be_deleted() {
        let store = MemoryStore::new();
        let customer = store.create_customer(new_customer("ann")).await.unwrap();
        let product = store.create_product(new_product(Decimal::ONE)).await.unwrap();
        let order = store
            .create_order(new_order(
                customer.id,
                vec![OrderLine {
                    product_id: product.id,
                    quantity: 1,
                }],
            ))
            .await
            .unwrap();

        assert!(matches!(
            store.delete_customer(customer.id).await,
            Err(RepositoryError::Conflict(_))
        ));
        assert!(matches!(
            store.delete_product(product.id).await,
            Err(RepositoryError::Conflict(_))
        ));

        assert!(store.delete_order(order.id).await.unwrap());
        assert!(store.delete_product(product.id).await.unwrap());
        assert!(store.delete_customer(customer.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_order_lines_must_reference_products() {
        let store = MemoryStore::new();
        let customer = store.create_customer(new_customer("ann")).await.unwrap();
        let line = OrderLine {
            product_id: ProductId::new(5),
            quantity: 1,
        };

        let err = store
            .create_order(new_order(customer.id, vec![line]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::MissingReference(Entity::Product)
        ));

        let order = store
            .create_order(new_order(customer.id, Vec::new()))
            .await
            .unwrap();
        let err = store
            .update_order(
                order.id,
                OrderPatch {
                    status: None,
                    lines: Some(vec![line]),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::MissingReference(Entity::Product)
        ));
    }

    #[tokio::test]
    async fn test_priced_lines_use_current_product_prices() {
        let store = MemoryStore::new();
        let customer = store.create_customer(new_customer("ann")).await.unwrap();
        let mug = store.create_product(new_product(Decimal::new(450, 2))).await.unwrap();
        let pot = store.create_product(new_product(Decimal::new(20, 0))).await.unwrap();
        let order = store
            .create_order(new_order(
                customer.id,
                vec![
                    OrderLine {
                        product_id: mug.id,
                        quantity: 2,
                    },
                    OrderLine {
                        product_id: pot.id,
                        quantity: 1,
                    },
                ],
            ))
            .await
            .unwrap();

        let lines = store.priced_lines(order.id).await.unwrap().unwrap();
        assert_eq!(order_total(&lines), Some(Decimal::new(29, 0)));

        store
            .update_product(
                mug.id,
                ProductPatch {
                    price: Some(Decimal::new(5, 0)),
                    ..ProductPatch::default()
                },
            )
            .await
            .unwrap();
        let lines = store.priced_lines(order.id).await.unwrap().unwrap();
        assert_eq!(order_total(&lines), Some(Decimal::new(30, 0)));

        assert!(store.priced_lines(OrderId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let store = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create_customer(new_customer(&format!("c{i}")))
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 32);
        assert_eq!(store.list_customers().await.unwrap().len(), 32);
    }
}
