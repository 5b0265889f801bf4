//! Customer Desk server library.
//!
//! A JSON HTTP API over four record kinds: customers, customer accounts,
//! products and orders. The binary in `main.rs` wires configuration,
//! logging and the store backend; everything it serves is built here so the
//! integration tests can drive the same router in-process.
//!
//! # Architecture
//!
//! - [`routes`] - one stateless handler per resource and method
//! - [`extract`] - JSON body and path extractors with JSON rejections
//! - [`cache`] - read-through response cache with explicit invalidation
//! - [`db`] - [`db::RecordStore`] with in-memory and `PostgreSQL` backends
//! - [`error`] - translation of failures into status codes and `{"error"}` bodies
//! - [`telemetry`] - tracing subscriber and Sentry setup

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

pub use app::build_router;
pub use state::AppState;
