//! Customer account repository.

use sqlx::{PgConnection, PgPool};

use customer_desk_core::{
    AccountId, CustomerAccount, CustomerAccountPatch, CustomerId, Entity, NewCustomerAccount,
};

use crate::db::RepositoryError;

const ACCOUNT_COLUMNS: &str = "id, customer_id, username, password_hash";

/// Repository for customer account database operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an account for an existing customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if the customer does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        new: &NewCustomerAccount,
    ) -> Result<CustomerAccount, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        ensure_customer(&mut tx, new.customer_id).await?;

        let account = sqlx::query_as::<_, CustomerAccount>(&format!(
            r"
            INSERT INTO customer_accounts (customer_id, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {ACCOUNT_COLUMNS}
            "
        ))
        .bind(new.customer_id)
        .bind(&new.username)
        .bind(&new.password_hash)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(account)
    }

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: AccountId,
    ) -> Result<Option<CustomerAccount>, RepositoryError> {
        let account = sqlx::query_as::<_, CustomerAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM customer_accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// List all accounts ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<CustomerAccount>, RepositoryError> {
        let accounts = sqlx::query_as::<_, CustomerAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM customer_accounts ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(accounts)
    }

    /// Apply the supplied fields of `patch`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: AccountId,
        patch: &CustomerAccountPatch,
    ) -> Result<Option<CustomerAccount>, RepositoryError> {
        let account = sqlx::query_as::<_, CustomerAccount>(&format!(
            r"
            UPDATE customer_accounts
            SET username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash)
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(patch.username.as_deref())
        .bind(patch.password_hash.as_deref())
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: AccountId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM customer_accounts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Fail with `MissingReference(Customer)` unless the customer exists.
///
/// Takes a row lock so the customer cannot be deleted before the caller's
/// transaction commits.
pub(super) async fn ensure_customer(
    conn: &mut PgConnection,
    id: CustomerId,
) -> Result<(), RepositoryError> {
    let found = sqlx::query_scalar::<_, i32>("SELECT id FROM customers WHERE id = $1 FOR SHARE")
        .bind(id)
        .fetch_optional(conn)
        .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(RepositoryError::MissingReference(Entity::Customer)),
    }
}
