//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! desk-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DESK_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! Migrations live in `crates/server/migrations/` and are embedded at build
//! time. Example structure:
//! ```text
//! migrations/
//! └── 20261015000001_create_tables.sql
//! ```

use super::{CommandError, connect};

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the URL is missing, the connection fails, or a
/// migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
