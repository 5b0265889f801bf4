//! Business logic services.
//!
//! - [`credentials`] - Account password hashing

pub mod credentials;
