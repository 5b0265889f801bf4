//! Product repository.

use sqlx::{PgConnection, PgPool};

use customer_desk_core::{Entity, NewProduct, OrderLine, Product, ProductId, ProductPatch};

use super::{out_of_range, restrict_violation};

const PRICE_OUT_OF_RANGE: &str = "Invalid field value: price is out of range";
use crate::db::RepositoryError;

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock_level";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product and return it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidValue` if the price does not fit
    /// `NUMERIC(12,2)`.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO products (name, description, price, stock_level)
            VALUES ($1, $2, $3, $4)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&new.name)
        .bind(new.description.as_deref())
        .bind(new.price)
        .bind(new.stock_level)
        .fetch_one(self.pool)
        .await
        .map_err(|e| out_of_range(e, PRICE_OUT_OF_RANGE))?;

        Ok(product)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// List all products ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Apply the supplied fields of `patch`. An explicit null description
    /// clears the column.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidValue` if the price does not fit
    /// `NUMERIC(12,2)`.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE products
            SET name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                price = COALESCE($5, price),
                stock_level = COALESCE($6, stock_level)
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.description.is_some())
        .bind(patch.description.as_ref().and_then(Option::as_deref))
        .bind(patch.price)
        .bind(patch.stock_level)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| out_of_range(e, PRICE_OUT_OF_RANGE))?;

        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if order lines still reference it.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| restrict_violation(e, "product is referenced by existing orders"))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Fail with `MissingReference(Product)` unless every line's product exists.
pub(super) async fn ensure_products(
    conn: &mut PgConnection,
    lines: &[OrderLine],
) -> Result<(), RepositoryError> {
    for line in lines {
        let found =
            sqlx::query_scalar::<_, i32>("SELECT id FROM products WHERE id = $1 FOR SHARE")
                .bind(line.product_id)
                .fetch_optional(&mut *conn)
                .await?;

        if found.is_none() {
            return Err(RepositoryError::MissingReference(Entity::Product));
        }
    }
    Ok(())
}
