//! Record types for the four entity kinds.
//!
//! Each kind has three shapes:
//! - the stored record (`Customer`, `Product`, ...) as returned by the store
//! - a creation input (`NewCustomer`, ...) carrying every required field
//! - a partial update (`CustomerPatch`, ...) where absent fields are left alone

pub mod account;
pub mod customer;
pub mod order;
pub mod product;

pub use account::{
    CreateAccount, CustomerAccount, CustomerAccountPatch, NewCustomerAccount, UpdateAccount,
};
pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use order::{CreateOrder, NewOrder, Order, OrderLine, OrderPatch};
pub use product::{NewProduct, Product, ProductPatch, StockLevel, StockUpdate};
