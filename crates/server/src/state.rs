//! Application state shared across handlers.

use std::sync::Arc;

use crate::cache::ResponseCache;
use crate::db::RecordStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and gives handlers the record
/// store and the response cache. Handlers keep no state of their own.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn RecordStore>,
    cache: ResponseCache,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `store` - Record store backend (memory or `PostgreSQL`)
    /// * `cache` - Response cache for read endpoints
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, cache: ResponseCache) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store, cache }),
        }
    }

    /// Get a reference to the record store.
    #[must_use]
    pub fn store(&self) -> &dyn RecordStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the response cache.
    #[must_use]
    pub fn cache(&self) -> &ResponseCache {
        &self.inner.cache
    }
}
