//! Customer Desk server binary.
//!
//! Serves the customer/account/product/order API on port 5000 by default.
//! Records live in `PostgreSQL` when `DESK_DATABASE_URL` is set and in
//! process memory otherwise.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use customer_desk_server::{
    AppState, build_router,
    cache::ResponseCache,
    config::ServerConfig,
    db::{self, MemoryStore, PgStore, RecordStore},
    telemetry,
};

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Sentry must be up before the subscriber so its layer can report
    let _sentry_guard = telemetry::init_sentry(&config);
    telemetry::init_tracing(&config);
    if config.sentry_dsn.is_some() {
        tracing::info!("Sentry initialized");
    }

    let store: Arc<dyn RecordStore> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");
            // NOTE: Migrations are NOT run automatically on startup.
            // Run them explicitly via: cargo run -p customer-desk-cli -- migrate
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("No database URL configured, records will be kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, ResponseCache::from_config(&config.cache));

    let app = build_router(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    tracing::info!("customer desk listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
