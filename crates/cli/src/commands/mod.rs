//! CLI subcommands.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use customer_desk_server::config::{ConfigError, ServerConfig};
use customer_desk_server::db::{RepositoryError, create_pool};
use customer_desk_server::error::AppError;

/// Errors surfaced by any subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    App(#[from] AppError),
}

/// Load the database URL the server would use and open a pool.
async fn connect() -> Result<PgPool, CommandError> {
    let config = ServerConfig::from_env()?;
    let database_url: SecretString = config
        .database_url
        .ok_or(CommandError::MissingEnvVar("DESK_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(create_pool(&database_url).await?)
}
