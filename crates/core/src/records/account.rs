//! Customer account records.
//!
//! Passwords arrive in plain text on [`CreateAccount`] / [`UpdateAccount`] and
//! are hashed by the server before a [`NewCustomerAccount`] or
//! [`CustomerAccountPatch`] is built. The stored hash is never serialized.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{AccountId, CustomerId};

/// A stored customer account.
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CustomerAccount {
    pub id: AccountId,
    pub customer_id: CustomerId,
    pub username: String,
    /// Argon2 PHC string.
    #[serde(skip)]
    pub password_hash: String,
}

impl fmt::Debug for CustomerAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomerAccount")
            .field("id", &self.id)
            .field("customer_id", &self.customer_id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Create-account request body.
#[derive(Clone, Deserialize)]
pub struct CreateAccount {
    pub customer_id: CustomerId,
    pub username: String,
    pub password: String,
}

impl CreateAccount {
    /// Keys that must be present in a create payload.
    pub const REQUIRED_FIELDS: &'static [&'static str] = &["customer_id", "username", "password"];
}

impl fmt::Debug for CreateAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateAccount")
            .field("customer_id", &self.customer_id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Update-account request body.
#[derive(Clone, Default, Deserialize)]
pub struct UpdateAccount {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for UpdateAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateAccount")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Store input for a new account, password already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomerAccount {
    pub customer_id: CustomerId,
    pub username: String,
    pub password_hash: String,
}

impl NewCustomerAccount {
    /// Attach a store-assigned ID.
    #[must_use]
    pub fn with_id(self, id: AccountId) -> CustomerAccount {
        CustomerAccount {
            id,
            customer_id: self.customer_id,
            username: self.username,
            password_hash: self.password_hash,
        }
    }
}

/// Partial account update. The owning customer cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerAccountPatch {
    pub username: Option<String>,
    pub password_hash: Option<String>,
}

impl CustomerAccountPatch {
    /// Overwrite the supplied fields on `account`.
    pub fn apply_to(self, account: &mut CustomerAccount) {
        if let Some(username) = self.username {
            account.username = username;
        }
        if let Some(password_hash) = self.password_hash {
            account.password_hash = password_hash;
        }
    }
}
