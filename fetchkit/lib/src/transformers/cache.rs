//! In-memory GET response cache.
//!
//! Entries are keyed by the target's canonical URL and hold the parsed JSON
//! body. Stale entries are not purged; they are overwritten on the next miss.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use once_cell::sync::Lazy;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use crate::compose::{SharedTransformer, Transformer};
use crate::fetch::{BoxFuture, FetchRef, FetchResult};
use crate::init::RequestInit;
use crate::response::Response;
use crate::target::RequestTarget;

/// Default maximum entry age: 60 seconds.
pub const DEFAULT_CACHE_MAX_AGE: Duration = Duration::from_secs(60);

/// A cached JSON body with its creation instant.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub data: Value,
    pub timestamp: Instant,
}

impl CacheEntry {
    /// Creates an entry stamped with the current instant.
    pub fn new(data: Value) -> Self {
        Self {
            data,
            timestamp: Instant::now(),
        }
    }

    /// Returns `true` while the entry is younger than `max_age`.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.timestamp.elapsed() < max_age
    }
}

/// Storage behind the [`cache`] transformer.
///
/// Concurrent misses for the same key each write their entry; the last
/// write wins.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<CacheEntry>;

    fn set(&self, key: String, entry: CacheEntry);

    /// Removes every entry.
    fn clear(&self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A [`CacheStore`] backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: String, entry: CacheEntry) {
        self.entries().insert(key, entry);
    }

    fn clear(&self) {
        self.entries().clear();
    }

    fn len(&self) -> usize {
        self.entries().len()
    }
}

/// Process-wide store used by [`cache`].
static DEFAULT_STORE: Lazy<Arc<MemoryCacheStore>> =
    Lazy::new(|| Arc::new(MemoryCacheStore::new()));

/// The process-wide store shared by every [`cache`] transformer.
///
/// Lives for the whole process; call [`CacheStore::clear`] to reset it.
pub fn default_cache_store() -> Arc<dyn CacheStore> {
    DEFAULT_STORE.clone()
}

struct Cache {
    max_age: Duration,
    store: Arc<dyn CacheStore>,
}

impl Transformer for Cache {
    fn apply(
        &self,
        next: FetchRef,
        target: RequestTarget,
        init: RequestInit,
    ) -> BoxFuture<'_, FetchResult> {
        Box::pin(async move {
            if !is_get(&target, &init) {
                return next.fetch(target, init).await;
            }

            let key = target.href();
            match self.store.get(&key) {
                Some(entry) if entry.is_fresh(self.max_age) => {
                    debug!(%key, "cache hit");
                    return Ok(Response::json(&entry.data));
                }
                Some(_) => debug!(%key, "cache entry expired"),
                None => debug!(%key, "cache miss"),
            }

            let response = next.fetch(target, init).await?;
            let data = response.json_value()?;
            let synthesized = Response::json(&data);
            self.store.set(key, CacheEntry::new(data));

            Ok(synthesized)
        })
    }
}

/// GET detection: the init's method, else a Request-like target's own method.
fn is_get(target: &RequestTarget, init: &RequestInit) -> bool {
    init.method
        .as_deref()
        .or_else(|| target.request_init().and_then(|i| i.method.as_deref()))
        .is_some_and(|m| m.eq_ignore_ascii_case("GET"))
}

/// Memoizes GET responses in the process-wide store.
///
/// Place it after [`method`](crate::method) in a composition: a request with
/// no method set is not treated as GET. Both hits and misses return a fresh
/// `200` response carrying the parsed JSON body with an
/// `application/json` content type; the upstream status and headers are not
/// preserved. A miss whose body is not JSON fails with a parse error and is
/// not stored.
pub fn cache(max_age: Duration) -> SharedTransformer {
    cache_with(max_age, default_cache_store())
}

/// Like [`cache`], backed by the given store.
///
/// ## Examples
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use fetchkit_lib::{MemoryCacheStore, cache_with};
///
/// let store = Arc::new(MemoryCacheStore::new());
/// let transformer = cache_with(Duration::from_secs(30), store.clone());
/// ```
pub fn cache_with(max_age: Duration, store: Arc<dyn CacheStore>) -> SharedTransformer {
    Arc::new(Cache { max_age, store })
}
