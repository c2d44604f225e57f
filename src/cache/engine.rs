//! Cache Engine Module
//!
//! Thread-safe, cloneable handle over a [`CacheStore`]. Adds fetch-then-store
//! refreshes with request coalescing and ownership of the periodic cleanup task.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{
    CacheConfig, CacheStats, CacheStore, Clock, EntryInfo, EvictionStrategy, KeyPattern,
    SetOptions, SystemClock,
};
use crate::error::{CacheError, Result};
use crate::tasks::spawn_cleanup_task;

/// A refresh in progress, awaited by every caller asking for the same key.
type PendingRefresh<T> = Shared<BoxFuture<'static, Option<T>>>;

/// In-flight handle; dies with the last caller still awaiting the refresh.
type InFlightRefresh<T> = WeakShared<BoxFuture<'static, Option<T>>>;

// == Cache Engine ==
/// Shared cache handle. Clones refer to the same underlying store.
///
/// # Example
/// ```
/// use tagged_cache::cache::{CacheConfig, CacheEngine, SetOptions};
///
/// # tokio_test::block_on(async {
/// let cache: CacheEngine<String> = CacheEngine::new(CacheConfig::default()).unwrap();
/// cache
///     .set("employees:1", "Ada".to_string(), SetOptions::new().tag("employees"))
///     .await
///     .unwrap();
///
/// assert_eq!(cache.get("employees:1").await, Some("Ada".to_string()));
/// assert_eq!(cache.clear_by_tag("employees").await, 1);
/// # });
/// ```
pub struct CacheEngine<T, C = SystemClock> {
    /// Guarded cache core
    store: Arc<RwLock<CacheStore<T, C>>>,
    /// Refreshes currently awaited, by key
    in_flight: Arc<Mutex<HashMap<String, InFlightRefresh<T>>>>,
    /// The single background cleanup task, when running
    cleanup_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<T, C> Clone for CacheEngine<T, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            in_flight: Arc::clone(&self.in_flight),
            cleanup_task: Arc::clone(&self.cleanup_task),
        }
    }
}

impl<T> CacheEngine<T, SystemClock>
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an engine using wall-clock time.
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<T, C> CacheEngine<T, C>
where
    T: Clone + Serialize + Send + Sync + 'static,
    C: Clock,
{
    /// Creates an engine reading time from `clock`.
    ///
    /// Fails with `InvalidOptions` on a zero TTL, capacity or cleanup interval.
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self> {
        let store = CacheStore::with_clock(config, clock)?;
        Ok(Self {
            store: Arc::new(RwLock::new(store)),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            cleanup_task: Arc::new(Mutex::new(None)),
        })
    }

    // == Core Operations ==
    /// Stores `data` under `key`. See [`CacheStore::set`].
    pub async fn set(&self, key: impl Into<String>, data: T, options: SetOptions) -> Result<()> {
        self.store.write().await.set(key, data, options)
    }

    /// Returns the live value for `key`, counting a hit or a miss.
    pub async fn get(&self, key: &str) -> Option<T> {
        // Write lock: stats change and expired entries are dropped
        self.store.write().await.get(key)
    }

    /// True if `key` holds an unexpired entry. Does not touch statistics.
    pub async fn has(&self, key: &str) -> bool {
        self.store.read().await.has(key)
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    /// Empties the cache and resets statistics. Call at session teardown.
    pub async fn clear(&self) {
        self.store.write().await.clear();
        info!("Cache cleared");
    }

    pub async fn clear_by_tag(&self, tag: &str) -> usize {
        self.store.write().await.clear_by_tag(tag)
    }

    pub async fn clear_expired(&self) -> usize {
        self.store.write().await.clear_expired()
    }

    /// Removes every key matching `pattern`; a `&str` is a substring match.
    pub async fn invalidate(&self, pattern: impl Into<KeyPattern>) -> usize {
        let pattern = pattern.into();
        self.store.write().await.invalidate(&pattern)
    }

    /// Removes one entry chosen by `strategy`, returning its key.
    pub async fn evict(&self, strategy: EvictionStrategy) -> Option<String> {
        self.store.write().await.evict(strategy)
    }

    /// Removes expired entries and stamps the cleanup time.
    pub async fn cleanup(&self) -> usize {
        self.store.write().await.cleanup()
    }

    // == Refresh ==
    /// Runs `fetcher` and stores its result under `key` with default options.
    ///
    /// A failed fetch is logged and yields `None`; whatever was cached before is
    /// left in place. Concurrent refreshes of the same key share one fetch and
    /// all receive its outcome.
    ///
    /// Dropping the returned future (for example on a caller's timeout) only
    /// abandons the fetch once no other caller awaits it; the next refresh of
    /// the key then runs its own fetcher.
    pub async fn refresh<F, Fut, E>(&self, key: &str, fetcher: F) -> Option<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let pending = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(key).and_then(WeakShared::upgrade) {
                Some(pending) => {
                    debug!(key, "Joining in-flight refresh");
                    pending
                }
                None => {
                    let pending = self.start_refresh(key.to_string(), fetcher);
                    // Drop handles of refreshes every caller gave up on
                    in_flight.retain(|_, handle| handle.upgrade().is_some());
                    if let Some(handle) = pending.downgrade() {
                        in_flight.insert(key.to_string(), handle);
                    }
                    pending
                }
            }
        };

        pending.await
    }

    /// Cache-aside read: returns the cached value, or refreshes on a miss.
    pub async fn get_or_refresh<F, Fut, E>(&self, key: &str, fetcher: F) -> Option<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        if let Some(data) = self.get(key).await {
            return Some(data);
        }
        self.refresh(key, fetcher).await
    }

    fn start_refresh<F, Fut, E>(&self, key: String, fetcher: F) -> PendingRefresh<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let in_flight = Arc::clone(&self.in_flight);

        async move {
            let outcome = match fetcher().await {
                Ok(data) => {
                    let stored = store
                        .write()
                        .await
                        .set(key.clone(), data.clone(), SetOptions::default());
                    match stored {
                        Ok(()) => Some(data),
                        Err(e) => {
                            warn!(key = %key, error = %e, "Refreshed value rejected by cache");
                            None
                        }
                    }
                }
                Err(e) => {
                    let failure = CacheError::FetchFailed(e.to_string());
                    warn!(key = %key, error = %failure, "Refresh failed, keeping cached value");
                    None
                }
            };

            in_flight.lock().await.remove(&key);
            outcome
        }
        .boxed()
        .shared()
    }

    // == Staleness Helpers ==
    /// Age of the live entry for `key`, `None` if absent.
    pub async fn get_age(&self, key: &str) -> Option<Duration> {
        self.store.read().await.get_age(key)
    }

    /// True if `key` is absent or older than its version's staleness window.
    pub async fn is_stale(&self, key: &str) -> bool {
        self.store.read().await.is_stale(key)
    }

    /// Metadata for the live entry under `key`.
    pub async fn entry_info(&self, key: &str) -> Option<EntryInfo> {
        let store = self.store.read().await;
        let now = store.now_ms();
        store.entry(key).map(|entry| entry.info(now))
    }

    // == Introspection ==
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.store.read().await.keys()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Configuration ==
    pub async fn config(&self) -> CacheConfig {
        self.store.read().await.config().clone()
    }

    pub async fn set_default_ttl(&self, ttl: Duration) -> Result<()> {
        self.store.write().await.set_default_ttl(ttl)
    }

    pub async fn set_max_entries(&self, max_entries: usize) -> Result<()> {
        self.store.write().await.set_max_entries(max_entries)
    }

    /// Changes the cleanup period; a running task picks it up after its current sleep.
    pub async fn set_cleanup_interval(&self, interval: Duration) -> Result<()> {
        self.store.write().await.set_cleanup_interval(interval)
    }

    pub async fn set_eviction_strategy(&self, strategy: EvictionStrategy) {
        self.store.write().await.set_eviction_strategy(strategy);
    }

    // == Cleanup Task ==
    /// Starts the periodic cleanup task.
    ///
    /// Returns `false` without spawning if one is already running for this engine.
    /// Must be called from within a tokio runtime.
    pub async fn start_cleanup(&self) -> bool {
        let mut slot = self.cleanup_task.lock().await;
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            debug!("Cleanup task already running");
            return false;
        }

        *slot = Some(spawn_cleanup_task(self.clone()));
        true
    }

    /// Stops the periodic cleanup task, returning whether one was running.
    pub async fn stop_cleanup(&self) -> bool {
        match self.cleanup_task.lock().await.take() {
            Some(handle) => {
                handle.abort();
                info!("Cleanup task stopped");
                true
            }
            None => false,
        }
    }

    pub async fn is_cleanup_running(&self) -> bool {
        self.cleanup_task
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
