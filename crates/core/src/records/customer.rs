//! Customer records.

use serde::{Deserialize, Serialize};

use crate::types::CustomerId;

/// A stored customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

/// Input for creating a customer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

impl NewCustomer {
    /// Keys that must be present in a create payload.
    pub const REQUIRED_FIELDS: &'static [&'static str] = &["name", "email", "phone_number"];

    /// Attach a store-assigned ID.
    #[must_use]
    pub fn with_id(self, id: CustomerId) -> Customer {
        Customer {
            id,
            name: self.name,
            email: self.email,
            phone_number: self.phone_number,
        }
    }
}

/// Partial customer update. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl CustomerPatch {
    /// Overwrite the supplied fields on `customer`.
    pub fn apply_to(self, customer: &mut Customer) {
        if let Some(name) = self.name {
            customer.name = name;
        }
        if let Some(email) = self.email {
            customer.email = email;
        }
        if let Some(phone_number) = self.phone_number {
            customer.phone_number = phone_number;
        }
    }
}
