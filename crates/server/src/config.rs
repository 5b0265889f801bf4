//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `DESK_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`). When unset the server keeps records in memory.
//! - `DESK_HOST` - Bind address (default: 127.0.0.1)
//! - `DESK_PORT` - Listen port (default: 5000)
//! - `DESK_CACHE_TTL_SECS` - Response cache time-to-live (default: 60)
//! - `DESK_CACHE_CAPACITY` - Response cache entry limit (default: 1000)
//! - `DESK_LOG_JSON` - Emit JSON logs when set to `1` or `true`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "5000";
const DEFAULT_CACHE_TTL_SECS: &str = "60";
const DEFAULT_CACHE_CAPACITY: &str = "1000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` connection URL (contains password). `None` selects the
    /// in-memory store.
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Response cache settings
    pub cache: CacheConfig,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Response cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a cached read stays valid
    pub ttl: Duration,
    /// Maximum number of cached entries
    pub capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            capacity: 1000,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = lookup("DESK_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .map(SecretString::from);
        let host = parse_var::<IpAddr>("DESK_HOST", &get_or_default("DESK_HOST", DEFAULT_HOST))?;
        let port = parse_var::<u16>("DESK_PORT", &get_or_default("DESK_PORT", DEFAULT_PORT))?;
        let ttl_secs = parse_var::<u64>(
            "DESK_CACHE_TTL_SECS",
            &get_or_default("DESK_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS),
        )?;
        let capacity = parse_var::<u64>(
            "DESK_CACHE_CAPACITY",
            &get_or_default("DESK_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY),
        )?;
        let log_json = lookup("DESK_LOG_JSON")
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        Ok(Self {
            database_url,
            host,
            port,
            cache: CacheConfig {
                ttl: Duration::from_secs(ttl_secs),
                capacity,
            },
            log_json,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parse a variable's value, naming the variable on failure.
fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
