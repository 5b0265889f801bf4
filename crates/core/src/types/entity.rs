//! Entity kinds served by the API.

use std::fmt;

/// One of the four record kinds held by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Customer,
    CustomerAccount,
    Product,
    Order,
}

impl Entity {
    /// Human-readable label used in response messages (e.g. "Customer account").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::CustomerAccount => "Customer account",
            Self::Product => "Product",
            Self::Order => "Order",
        }
    }

    /// Path segment the kind's routes are mounted under.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Customer => "customers",
            Self::CustomerAccount => "customer_accounts",
            Self::Product => "products",
            Self::Order => "orders",
        }
    }

    /// The fixed not-found message for this kind.
    #[must_use]
    pub fn not_found_message(self) -> String {
        format!("{} not found", self.label())
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
