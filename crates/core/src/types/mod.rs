//! Core types for Customer Desk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod entity;
pub mod id;
pub mod price;
pub mod status;

pub use entity::Entity;
pub use id::*;
pub use price::{PricedLine, order_total};
pub use status::OrderStatus;
