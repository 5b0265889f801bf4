//! Account password hashing.
//!
//! Passwords are hashed with Argon2id before they reach the record store.
//! Hashing is CPU-bound, so the async helpers run it on the blocking pool.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

/// Hash a password into an Argon2 PHC string.
///
/// # Errors
///
/// Returns `AppError::Internal` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// [`hash_password`] on the blocking thread pool.
///
/// # Errors
///
/// Returns `AppError::Internal` if hashing fails or the task panics.
pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("password hashing task failed: {e}")))?
}
