//! Read-through cache for rendered JSON responses.
//!
//! Read handlers for customers, accounts and products go through
//! [`ResponseCache::get_or_compute`]. Write handlers invalidate explicitly:
//! creates drop the kind's list entry, updates and deletes drop both the list
//! entry and the single-record entry for the touched ID.
//!
//! Errors from the compute function are returned as-is and never cached, so a
//! 404 for an ID is recomputed on the next request.
//!
//! Every invalidation bumps a generation counter. A miss records the
//! generation before computing and only stores its value if no invalidation
//! happened meanwhile, so a read racing a write cannot re-insert the body it
//! computed before the write landed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use customer_desk_core::Entity;

use crate::config::CacheConfig;

/// Cache key for list and single-record reads.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    List(Entity),
    Record(Entity, i32),
}

/// Cached JSON bodies keyed by endpoint and argument, with a fixed TTL.
///
/// Cheap to clone; clones share the same entries.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Cache<CacheKey, Value>,
    /// Invalidation count. Held across inserts and invalidations so the two
    /// never interleave.
    generation: Arc<Mutex<u64>>,
}

impl ResponseCache {
    /// Create a cache whose entries expire `ttl` after insertion.
    #[must_use]
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self {
            entries,
            generation: Arc::new(Mutex::new(0)),
        }
    }

    /// Create a cache from configuration.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl, config.capacity)
    }

    /// Return the cached value for `key`, or run `compute` and cache its
    /// successful result.
    ///
    /// The result is returned but not cached if any entry was invalidated
    /// while `compute` ran.
    ///
    /// # Errors
    ///
    /// Returns whatever error `compute` returns. Failed computations are not
    /// cached.
    pub async fn get_or_compute<F, Fut, E>(&self, key: CacheKey, compute: F) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        if let Some(value) = self.entries.get(&key).await {
            debug!(?key, "response cache hit");
            return Ok(value);
        }

        debug!(?key, "response cache miss");
        let started = *self.generation.lock().await;
        let value = compute().await?;

        {
            let generation = self.generation.lock().await;
            if *generation == started {
                self.entries.insert(key, value.clone()).await;
            } else {
                debug!(?key, "invalidated during compute, not caching");
            }
        }

        Ok(value)
    }

    /// Drop one entry.
    pub async fn invalidate(&self, key: &CacheKey) {
        let mut generation = self.generation.lock().await;
        *generation = generation.wrapping_add(1);
        self.entries.invalidate(key).await;
    }

    /// Drop the list entry for `entity`. Called after every create.
    pub async fn invalidate_list(&self, entity: Entity) {
        self.invalidate(&CacheKey::List(entity)).await;
    }

    /// Drop the list entry and the record entry for `id`. Called after every
    /// update or delete.
    pub async fn invalidate_record(&self, entity: Entity, id: i32) {
        self.invalidate(&CacheKey::List(entity)).await;
        self.invalidate(&CacheKey::Record(entity, id)).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    fn cache() -> ResponseCache {
        ResponseCache::new(Duration::from_secs(60), 100)
    }

    async fn counted(
        cache: &ResponseCache,
        key: CacheKey,
        calls: &AtomicUsize,
        value: Value,
    ) -> Value {
        cache
            .get_or_compute(key, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>(value)
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let key = CacheKey::List(Entity::Product);

        let first = counted(&cache, key, &calls, json!([1])).await;
        let second = counted(&cache, key, &calls, json!([1, 2])).await;

        assert_eq!(first, json!([1]));
        assert_eq!(second, json!([1]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = cache();
        let key = CacheKey::Record(Entity::Customer, 1);

        let err = cache
            .get_or_compute(key, || async { Err::<Value, _>("not found") })
            .await
            .unwrap_err();
        assert_eq!(err, "not found");

        let value = cache
            .get_or_compute(key, || async { Ok::<_, &str>(json!({"id": 1})) })
            .await
            .unwrap();
        assert_eq!(value, json!({"id": 1}));
    }

    #[tokio::test]
    async fn test_invalidate_list_keeps_records() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let list = CacheKey::List(Entity::Customer);
        let record = CacheKey::Record(Entity::Customer, 3);

        counted(&cache, list, &calls, json!([])).await;
        counted(&cache, record, &calls, json!({"id": 3})).await;
        cache.invalidate_list(Entity::Customer).await;

        counted(&cache, list, &calls, json!([])).await;
        counted(&cache, record, &calls, json!({"id": 3})).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_invalidate_record_drops_list_and_record() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let list = CacheKey::List(Entity::Product);
        let record = CacheKey::Record(Entity::Product, 3);
        let other = CacheKey::Record(Entity::Product, 4);

        counted(&cache, list, &calls, json!([])).await;
        counted(&cache, record, &calls, json!({"id": 3})).await;
        counted(&cache, other, &calls, json!({"id": 4})).await;
        cache.invalidate_record(Entity::Product, 3).await;

        let refreshed = counted(&cache, record, &calls, json!({"id": 3, "name": "new"})).await;
        counted(&cache, list, &calls, json!([])).await;
        counted(&cache, other, &calls, json!({"id": 4})).await;

        assert_eq!(refreshed, json!({"id": 3, "name": "new"}));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_kinds_do_not_share_entries() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        counted(&cache, CacheKey::List(Entity::Customer), &calls, json!(["c"])).await;
        let products = counted(&cache, CacheKey::List(Entity::Product), &calls, json!(["p"])).await;

        assert_eq!(products, json!(["p"]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = ResponseCache::new(Duration::from_millis(50), 100);
        let calls = AtomicUsize::new(0);
        let key = CacheKey::List(Entity::CustomerAccount);

        counted(&cache, key, &calls, json!([])).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        counted(&cache, key, &calls, json!([])).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_value_computed_across_invalidation_is_not_cached() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let key = CacheKey::List(Entity::Product);

        let writer = cache.clone();
        let stale = cache
            .get_or_compute(key, move || async move {
                // A write commits and invalidates after this read took its snapshot.
                writer.invalidate_list(Entity::Product).await;
                Ok::<_, ()>(json!(["old"]))
            })
            .await
            .unwrap();
        assert_eq!(stale, json!(["old"]));

        let fresh = counted(&cache, key, &calls, json!(["old", "new"])).await;
        assert_eq!(fresh, json!(["old", "new"]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Without further writes the recomputed body is cached again.
        let again = counted(&cache, key, &calls, json!(["ignored"])).await;
        assert_eq!(again, json!(["old", "new"]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_read_and_invalidation() {
        let cache = cache();
        let key = CacheKey::Record(Entity::Customer, 7);
        let (snapshot_taken, wait_for_snapshot) = tokio::sync::oneshot::channel::<()>();
        let (write_done, wait_for_write) = tokio::sync::oneshot::channel::<()>();

        let reader = cache.clone();
        let read = tokio::spawn(async move {
            reader
                .get_or_compute(key, || async move {
                    snapshot_taken.send(()).unwrap();
                    wait_for_write.await.unwrap();
                    Ok::<_, ()>(json!({"id": 7, "name": "before"}))
                })
                .await
                .unwrap()
        });

        wait_for_snapshot.await.unwrap();
        cache.invalidate_record(Entity::Customer, 7).await;
        write_done.send(()).unwrap();

        assert_eq!(read.await.unwrap(), json!({"id": 7, "name": "before"}));

        let after = cache
            .get_or_compute(key, || async { Ok::<_, ()>(json!({"id": 7, "name": "after"})) })
            .await
            .unwrap();
        assert_eq!(after, json!({"id": 7, "name": "after"}));
    }
}
