//! Product records.
//!
//! Negative prices and stock levels are accepted as-is. Prices are read from
//! JSON numbers or decimal strings and always written back as numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::ProductId;

/// A stored product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub stock_level: i32,
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_level: i32,
}

impl NewProduct {
    /// Keys that must be present in a create payload.
    pub const REQUIRED_FIELDS: &'static [&'static str] = &["name", "price", "stock_level"];

    /// Attach a store-assigned ID.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock_level: self.stock_level,
        }
    }
}

/// Partial product update. `None` leaves the stored value unchanged.
///
/// `description` is nullable: an absent key is `None`, an explicit JSON
/// `null` is `Some(None)` and clears the stored description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub price: Option<Decimal>,
    pub stock_level: Option<i32>,
}

impl ProductPatch {
    /// A patch touching only the stock level.
    #[must_use]
    pub fn stock(stock_level: i32) -> Self {
        Self {
            stock_level: Some(stock_level),
            ..Self::default()
        }
    }

    /// Overwrite the supplied fields on `product`.
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock_level) = self.stock_level {
            product.stock_level = stock_level;
        }
    }
}

/// Marks a key as present, keeping an explicit `null` distinct from absence.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `PUT /products/{id}/stock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StockUpdate {
    pub stock_level: i32,
}

impl StockUpdate {
    /// Keys that must be present in a stock payload.
    pub const REQUIRED_FIELDS: &'static [&'static str] = &["stock_level"];
}

/// Body of `GET /products/{id}/stock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockLevel {
    pub product_id: ProductId,
    pub stock_level: i32,
}

impl From<&Product> for StockLevel {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            stock_level: product.stock_level,
        }
    }
}
