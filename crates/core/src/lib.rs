//! Customer Desk Core - Shared record types.
//!
//! This crate provides the types shared by every Customer Desk component:
//! - `server` - HTTP API over customers, accounts, products and orders
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Request payload validation and order pricing live here so
//! that both store backends and the HTTP layer agree on them.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, entity kinds, order status and pricing
//! - [`records`] - The four record kinds with their create/patch inputs
//! - [`validation`] - Required-field presence checks on JSON payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod records;
pub mod types;
pub mod validation;

pub use records::*;
pub use types::*;
pub use validation::{ValidationError, ensure_not_empty, require};
