//! Logging and error tracking setup for the server binary.
//!
//! Events go to stdout as text, or as flattened JSON lines when
//! `DESK_LOG_JSON` is set. When a Sentry DSN is configured, `ERROR` and
//! `WARN` events become Sentry events and `INFO`/`DEBUG` events are attached
//! to them as breadcrumbs.

use std::borrow::Cow;

use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use tracing::{Level, Metadata};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

/// Filter directives used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "customer_desk_server=info,tower_http=debug";

/// Start the Sentry client if a DSN is configured.
///
/// The returned guard flushes pending events on drop and must live as long
/// as the process.
#[must_use]
pub fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config.sentry_environment.clone().map(Cow::Owned),
            attach_stacktrace: true,
            // Request bodies can carry account passwords
            send_default_pii: false,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Install the global tracing subscriber.
///
/// Call after [`init_sentry`] so the Sentry layer has a client to report to.
pub fn init_tracing(config: &ServerConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json_layer = config
        .log_json
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!config.log_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_filter))
        .init();
}

/// Map a tracing level to what Sentry should do with the event.
fn sentry_filter(metadata: &Metadata<'_>) -> EventFilter {
    match *metadata.level() {
        Level::ERROR | Level::WARN => EventFilter::Event,
        Level::INFO | Level::DEBUG => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    }
}
