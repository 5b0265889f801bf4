//! Order repository.
//!
//! Orders are split over `orders` and `order_lines`. Writes touching both run
//! in one transaction; an error anywhere drops the transaction and rolls the
//! whole write back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use customer_desk_core::{
    CustomerId, NewOrder, Order, OrderId, OrderLine, OrderPatch, OrderStatus, PricedLine,
    ProductId,
};

use super::accounts::ensure_customer;
use super::products::ensure_products;
use crate::db::RepositoryError;

const ORDER_COLUMNS: &str = "id, customer_id, status, order_date";

/// Database row for `orders` (without lines).
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_id: CustomerId,
    status: OrderStatus,
    order_date: DateTime<Utc>,
}

impl OrderRow {
    fn with_lines(self, lines: Vec<OrderLine>) -> Order {
        Order {
            id: self.id,
            customer_id: self.customer_id,
            status: self.status,
            order_date: self.order_date,
            lines,
        }
    }
}

/// Database row for `order_lines`.
#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    order_id: OrderId,
    product_id: ProductId,
    quantity: i32,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if the customer or any
    /// line's product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        ensure_customer(&mut tx, new.customer_id).await?;
        ensure_products(&mut tx, &new.lines).await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO orders (customer_id, status, order_date)
            VALUES ($1, $2, $3)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(new.customer_id)
        .bind(&new.status)
        .bind(new.order_date)
        .fetch_one(&mut *tx)
        .await?;

        insert_lines(&mut tx, row.id, &new.lines).await?;

        tx.commit().await?;
        Ok(row.with_lines(new.lines.clone()))
    }

    /// Get an order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        fetch_order(&mut conn, id).await
    }

    /// List all orders with their lines, ordered by ID.
    ///
    /// Both reads share one `REPEATABLE READ` snapshot, so every order is
    /// listed with exactly the lines it had at that point.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY id"
        ))
        .fetch_all(&mut *tx)
        .await?;

        let line_rows = sqlx::query_as::<_, LineRow>(
            "SELECT order_id, product_id, quantity FROM order_lines ORDER BY order_id, id",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut lines_by_order: HashMap<OrderId, Vec<OrderLine>> = HashMap::new();
        for line in line_rows {
            lines_by_order
                .entry(line.order_id)
                .or_default()
                .push(OrderLine {
                    product_id: line.product_id,
                    quantity: line.quantity,
                });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let lines = lines_by_order.remove(&row.id).unwrap_or_default();
                row.with_lines(lines)
            })
            .collect())
    }

    /// Apply `patch`: a new status, and/or a replacement line set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if a replacement line names
    /// a missing product.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: OrderId,
        patch: &OrderPatch,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_scalar::<_, i32>(
            r"
            UPDATE orders
            SET status = COALESCE($2, status)
            WHERE id = $1
            RETURNING id
            ",
        )
        .bind(id)
        .bind(patch.status.as_ref())
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(lines) = &patch.lines {
            ensure_products(&mut tx, lines).await?;
            sqlx::query("DELETE FROM order_lines WHERE order_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_lines(&mut tx, id, lines).await?;
        }

        let order = fetch_order(&mut tx, id).await?;
        tx.commit().await?;
        Ok(order)
    }

    /// Delete an order. Its lines are removed by `ON DELETE CASCADE`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lines of an order with each product's current price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn priced_lines(
        &self,
        id: OrderId,
    ) -> Result<Option<Vec<PricedLine>>, RepositoryError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        if !exists {
            return Ok(None);
        }

        let lines = sqlx::query_as::<_, PricedLine>(
            r"
            SELECT p.price AS unit_price, l.quantity
            FROM order_lines l
            JOIN products p ON p.id = l.product_id
            WHERE l.order_id = $1
            ORDER BY l.id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(lines))
    }
}

async fn insert_lines(
    conn: &mut PgConnection,
    order_id: OrderId,
    lines: &[OrderLine],
) -> Result<(), RepositoryError> {
    for line in lines {
        sqlx::query("INSERT INTO order_lines (order_id, product_id, quantity) VALUES ($1, $2, $3)")
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn fetch_order(
    conn: &mut PgConnection,
    id: OrderId,
) -> Result<Option<Order>, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let lines = sqlx::query_as::<_, OrderLine>(
        "SELECT product_id, quantity FROM order_lines WHERE order_id = $1 ORDER BY id",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(row.with_lines(lines)))
}
