use std::{
    any::Any,
    collections::HashMap,
    fmt::{Debug, Display},
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};

use log::*;
use tokio::sync::{broadcast, RwLock};

use crate::cache::{QueryKey, QueryState};

const DEFAULT_STALE_TIME: Duration = Duration::from_secs(30);
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a fetched value is served without refetching. Zero means every read refetches.
    pub stale_time: Duration,
    /// How many invalidation notices a slow subscriber may lag behind before it starts missing them.
    pub broadcast_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { stale_time: DEFAULT_STALE_TIME, broadcast_capacity: DEFAULT_BROADCAST_CAPACITY }
    }
}

impl CacheConfig {
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }
}

struct CacheEntry {
    value: Option<Arc<dyn Any + Send + Sync>>,
    fetched_at: Option<Instant>,
    invalidated: bool,
    /// Bumped on every invalidation, so that a fetch that started before an invalidation is not mistaken for fresh.
    generation: u64,
    fetch_count: u64,
    state: QueryState,
}

impl Default for CacheEntry {
    fn default() -> Self {
        Self {
            value: None,
            fetched_at: None,
            invalidated: false,
            generation: 0,
            fetch_count: 0,
            state: QueryState::Pending,
        }
    }
}

impl CacheEntry {
    fn is_stale(&self, stale_time: Duration) -> bool {
        match self.fetched_at {
            Some(t) => self.invalidated || t.elapsed() >= stale_time,
            None => true,
        }
    }

    fn value<V: Send + Sync + 'static>(&self) -> Option<Arc<V>> {
        self.value.as_ref().and_then(|v| Arc::clone(v).downcast::<V>().ok())
    }
}

/// A key-value cache of query results supporting read-or-fetch and invalidation.
///
/// Values are stored type-erased. Reading a key back with a different type than it was stored with is treated as a
/// cache miss.
///
/// The lock is never held while a fetcher runs. Concurrent reads of a stale key will each run their own fetch; the
/// last one to finish wins.
pub struct QueryCache {
    config: CacheConfig,
    entries: RwLock<HashMap<QueryKey, CacheEntry>>,
    invalidations: broadcast::Sender<QueryKey>,
}

impl Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "QueryCache (stale_time: {:?})", self.config.stale_time)
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        let (invalidations, _) = broadcast::channel(config.broadcast_capacity.max(1));
        Self { config, entries: RwLock::new(HashMap::new()), invalidations }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the cached value for `key` if it is still fresh, otherwise runs `fetcher` and caches the result.
    ///
    /// If the fetch fails, the error is recorded against the key (see [`Self::state`]), any previous value is kept,
    /// and the error is returned unchanged.
    pub async fn fetch_query<V, E, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<Arc<V>, E>
    where
        V: Send + Sync + 'static,
        E: Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let generation = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) => {
                    if !entry.is_stale(self.config.stale_time) {
                        if let Some(value) = entry.value::<V>() {
                            trace!("🗂️ Cache hit for '{key}'");
                            return Ok(value);
                        }
                    }
                    entry.generation
                },
                None => 0,
            }
        };
        debug!("🗂️ Fetching '{key}'");
        let result = fetcher().await;
        let mut entries = self.entries.write().await;
        let entry = entries.entry(key.clone()).or_default();
        entry.fetch_count += 1;
        match result {
            Ok(value) => {
                let value = Arc::new(value);
                entry.value = Some(Arc::clone(&value) as Arc<dyn Any + Send + Sync>);
                entry.fetched_at = Some(Instant::now());
                entry.state = QueryState::Success;
                if entry.generation == generation {
                    entry.invalidated = false;
                } else {
                    debug!("🗂️ '{key}' was invalidated while it was being fetched. It stays stale.");
                }
                Ok(value)
            },
            Err(e) => {
                warn!("🗂️ Fetching '{key}' failed. {e}");
                entry.state = QueryState::Failed(e.to_string());
                Err(e)
            },
        }
    }

    /// Marks the entry for `key` as stale and notifies every subscriber, so that the next read refetches.
    pub async fn invalidate(&self, key: &QueryKey) {
        {
            let mut entries = self.entries.write().await;
            if let Some(entry) = entries.get_mut(key) {
                entry.invalidated = true;
                entry.generation += 1;
            }
        }
        debug!("🗂️ '{key}' invalidated");
        // An error here only means that nobody is listening
        let _ = self.invalidations.send(key.clone());
    }

    /// Subscribe to invalidation notices. Every call to [`Self::invalidate`] sends the key to all receivers.
    pub fn subscribe(&self) -> broadcast::Receiver<QueryKey> {
        self.invalidations.subscribe()
    }

    /// Returns the cached value for `key`, regardless of whether it is stale.
    pub async fn get_cached<V: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<V>> {
        self.entries.read().await.get(key).and_then(|e| e.value::<V>())
    }

    pub async fn state(&self, key: &QueryKey) -> QueryState {
        self.entries.read().await.get(key).map(|e| e.state.clone()).unwrap_or(QueryState::Pending)
    }

    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries.read().await.get(key).map(|e| e.is_stale(self.config.stale_time)).unwrap_or(true)
    }

    /// The number of fetches that have completed (successfully or not) for `key`.
    pub async fn fetch_count(&self, key: &QueryKey) -> u64 {
        self.entries.read().await.get(key).map(|e| e.fetch_count).unwrap_or(0)
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
        debug!("🗂️ Cache cleared");
    }
}
