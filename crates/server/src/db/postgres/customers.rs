//! Customer repository.

use sqlx::PgPool;

use customer_desk_core::{Customer, CustomerId, CustomerPatch, NewCustomer};

use super::restrict_violation;
use crate::db::RepositoryError;

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a customer and return it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: &NewCustomer) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            INSERT INTO customers (name, email, phone_number)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, phone_number
            ",
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone_number)
        .fetch_one(self.pool)
        .await?;

        Ok(customer)
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone_number FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// List all customers ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone_number FROM customers ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }

    /// Apply the supplied fields of `patch`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: CustomerId,
        patch: &CustomerPatch,
    ) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            UPDATE customers
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone_number = COALESCE($4, phone_number)
            WHERE id = $1
            RETURNING id, name, email, phone_number
            ",
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.email.as_deref())
        .bind(patch.phone_number.as_deref())
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if accounts or orders still
    /// reference the customer.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| restrict_violation(e, "customer still has accounts or orders"))?;

        Ok(result.rows_affected() > 0)
    }
}
