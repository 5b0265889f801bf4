//! Order records.
//!
//! An order belongs to one customer and holds zero or more lines, each naming
//! a product and a quantity. Prices are not copied onto lines; totals are
//! computed from the products' current prices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CustomerId, OrderId, OrderStatus, ProductId};
use crate::validation::ValidationError;

/// One product/quantity pair on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// A stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

/// Create-order request body.
///
/// Accepts either a `lines` array or a single top-level
/// `product_id`/`quantity` pair.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    pub customer_id: CustomerId,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lines: Option<Vec<OrderLine>>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub quantity: Option<i32>,
}

impl CreateOrder {
    /// Keys that must be present in every create payload.
    pub const REQUIRED_FIELDS: &'static [&'static str] = &["customer_id"];

    /// Keys required when the payload has no `lines` array.
    pub const SINGLE_LINE_FIELDS: &'static [&'static str] = &["product_id", "quantity"];

    /// Resolve defaults and the single-line shorthand into a store input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingFields` if neither `lines` nor both of
    /// `product_id` and `quantity` were supplied.
    pub fn into_new_order(self, now: DateTime<Utc>) -> Result<NewOrder, ValidationError> {
        let lines = match (self.lines, self.product_id, self.quantity) {
            (Some(lines), _, _) => lines,
            (None, Some(product_id), Some(quantity)) => vec![OrderLine {
                product_id,
                quantity,
            }],
            (None, product_id, quantity) => {
                let mut missing = Vec::new();
                if product_id.is_none() {
                    missing.push("product_id".to_owned());
                }
                if quantity.is_none() {
                    missing.push("quantity".to_owned());
                }
                return Err(ValidationError::MissingFields(missing));
            }
        };

        Ok(NewOrder {
            customer_id: self.customer_id,
            status: self.status.unwrap_or_default(),
            order_date: self.order_date.unwrap_or(now),
            lines,
        })
    }
}

/// Store input for a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

impl NewOrder {
    /// Attach a store-assigned ID.
    #[must_use]
    pub fn with_id(self, id: OrderId) -> Order {
        Order {
            id,
            customer_id: self.customer_id,
            status: self.status,
            order_date: self.order_date,
            lines: self.lines,
        }
    }
}

/// Partial order update.
///
/// `lines`, when present, replaces the whole line set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub lines: Option<Vec<OrderLine>>,
}

impl OrderPatch {
    /// Overwrite the supplied fields on `order`.
    pub fn apply_to(self, order: &mut Order) {
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(lines) = self.lines {
            order.lines = lines;
        }
    }
}
