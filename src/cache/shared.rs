//! Shared Cache Module
//!
//! Thread-safe cache handle: one lock around the store, an eviction listener,
//! and the background sweeper bound to the cache's lifetime.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tracing::debug;

use crate::cache::entry::{deadline_after, ttl_from_secs};
use crate::cache::listener::notify_all;
use crate::cache::store::SweepOutcome;
use crate::cache::{CacheStats, CacheStore, EvictionListener, Removal, RemovalCause, TtlStatus};
use crate::config::{CacheConfig, SweepConfig};
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweeper_task, SweeperHandle};

// == Shared State ==
/// State shared between cache callers and the sweeper.
pub(crate) struct Shared<K, V> {
    store: Mutex<CacheStore<K, V>>,
    listener: RwLock<Option<EvictionListener<K, V>>>,
}

impl<K: Hash + Eq + Clone, V> Shared<K, V> {
    pub(crate) fn new(max_entries: usize) -> Self {
        Self {
            store: Mutex::new(CacheStore::new(max_entries)),
            listener: RwLock::new(None),
        }
    }

    pub(crate) fn set_listener(&self, listener: EvictionListener<K, V>) {
        *self.listener.write() = Some(listener);
    }

    /// Runs `f` under the store lock, then notifies the listener of any
    /// removals once the lock is released.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut CacheStore<K, V>) -> R) -> R {
        let (result, removals) = {
            let mut store = self.store.lock();
            let result = f(&mut store);
            (result, store.take_removals())
        };
        self.notify(removals);
        result
    }

    /// One sweeper pass, sized from the current entry count.
    pub(crate) fn sweep_once(&self, sweep: &SweepConfig) -> SweepOutcome {
        self.update(|store| {
            let samples = sweep.samples_for(store.len());
            store.sweep(samples, sweep.promote_inspected, Instant::now())
        })
    }

    fn notify(&self, removals: Vec<Removal<K, V>>) {
        if removals.is_empty() {
            return;
        }
        let listener = self.listener.read().clone();
        notify_all(listener.as_ref(), removals);
    }
}

// == Cache ==
/// Bounded LRU cache with optional per-entry TTL.
///
/// All operations take `&self` and may be called from any thread. A
/// background sweeper, started on construction, reclaims expired entries
/// a bounded batch at a time; expired entries are also reclaimed lazily on
/// read and are never returned.
///
/// `Cache::default()` is an unconstructed handle: writes fail with
/// [`CacheError::Uninitialized`] and reads behave as on an empty cache.
///
/// # Eviction listener
/// The listener is called exactly once for every entry leaving the cache,
/// whatever the [`RemovalCause`]. It runs after the cache lock has been
/// released, so it may call back into the cache.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use ttl_lru::Cache;
///
/// # #[tokio::main]
/// # async fn main() -> ttl_lru::error::Result<()> {
/// let cache = Cache::new(1000)?;
/// cache.set_with_ttl("session", 42, Duration::from_secs(30))?;
/// assert_eq!(cache.get(&"session"), Some(42));
/// # Ok(())
/// # }
/// ```
pub struct Cache<K, V> {
    shared: Option<Arc<Shared<K, V>>>,
    sweeper: Option<SweeperHandle>,
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self {
            shared: None,
            sweeper: None,
        }
    }
}

impl<K, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("initialized", &self.shared.is_some())
            .field("sweeper", &self.sweeper)
            .finish()
    }
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    // == Constructor ==
    /// Creates a cache holding at most `max_entries` entries (0 = no limit)
    /// with default sweeper settings.
    ///
    /// Must be called from within a Tokio runtime, which hosts the sweeper.
    pub fn new(max_entries: usize) -> Result<Self> {
        Self::from_config(&CacheConfig::with_max_entries(max_entries))
    }

    /// Creates a cache from a full configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let shared = Arc::new(Shared::new(config.max_entries));
        let sweeper = spawn_sweeper_task(Arc::downgrade(&shared), config.sweep.clone());
        debug!(max_entries = config.max_entries, "Cache created");

        Ok(Self {
            shared: Some(shared),
            sweeper: Some(sweeper),
        })
    }

    // == Eviction Listener ==
    /// Installs the listener invoked for every removed entry, replacing any
    /// previous one.
    pub fn set_eviction_listener<F>(&self, listener: F) -> Result<()>
    where
        F: Fn(K, V, RemovalCause) + Send + Sync + 'static,
    {
        self.shared()?.set_listener(Arc::new(listener));
        Ok(())
    }

    // == Set ==
    /// Stores a value that never expires, replacing any previous value and
    /// deadline for `key`.
    pub fn set(&self, key: K, value: V) -> Result<()> {
        let shared = self.shared()?;
        shared.update(|store| store.set(key, value, None));
        Ok(())
    }

    /// Stores a value that expires after `ttl`. A zero `ttl` is rejected with
    /// [`CacheError::InvalidTtl`] and the cache is left untouched.
    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) -> Result<()> {
        let shared = self.shared()?;
        let expire_at = deadline_after(Instant::now(), ttl)?;
        shared.update(|store| store.set(key, value, Some(expire_at)));
        Ok(())
    }

    /// Stores a value that expires after `seconds`, which must be positive.
    pub fn set_ex(&self, key: K, value: V, seconds: i64) -> Result<()> {
        self.shared()?;
        self.set_with_ttl(key, value, ttl_from_secs(seconds)?)
    }

    // == Get ==
    /// Returns a copy of the live value for `key` and marks it most recently
    /// used. Returns None if the key is absent or expired.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let shared = self.shared.as_ref()?;
        let now = Instant::now();
        shared.update(|store| store.get(key, now).cloned())
    }

    /// True if `key` holds a live value. Does not affect recency.
    pub fn contains_key(&self, key: &K) -> bool {
        self.shared
            .as_ref()
            .is_some_and(|shared| shared.store.lock().contains_key(key, Instant::now()))
    }

    // == Remove ==
    /// Removes `key`. Returns false, without notifying the listener, if it
    /// was not present.
    pub fn remove(&self, key: &K) -> bool {
        self.shared
            .as_ref()
            .is_some_and(|shared| shared.update(|store| store.remove(key)))
    }

    // == Keys ==
    /// Snapshot of live keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.shared
            .as_ref()
            .map(|shared| shared.store.lock().keys(Instant::now()))
            .unwrap_or_default()
    }

    // == Flush All ==
    /// Removes every entry at once. Capacity, listener and sweeper are kept.
    pub fn flush_all(&self) {
        if let Some(shared) = self.shared.as_ref() {
            let flushed = shared.update(|store| store.flush_all());
            debug!(flushed, "Cache flushed");
        }
    }

    // == Length ==
    /// Number of live entries. Expired entries not yet reclaimed are not
    /// counted.
    pub fn len(&self) -> usize {
        self.shared
            .as_ref()
            .map_or(0, |shared| shared.store.lock().live_len(Instant::now()))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == TTL ==
    /// Remaining lifetime of `key`.
    pub fn ttl(&self, key: &K) -> TtlStatus {
        self.shared
            .as_ref()
            .map_or(TtlStatus::NotFound, |shared| {
                shared.store.lock().ttl(key, Instant::now())
            })
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.shared
            .as_ref()
            .map(|shared| shared.store.lock().stats())
            .unwrap_or_default()
    }

    /// Configured capacity, 0 = unbounded.
    pub fn max_entries(&self) -> usize {
        self.shared
            .as_ref()
            .map_or(0, |shared| shared.store.lock().max_entries())
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.is_some()
    }

    // == Shutdown ==
    /// Stops the background sweeper. The cache stays usable; expired entries
    /// are then only reclaimed when read.
    pub fn shutdown(&self) {
        if let Some(sweeper) = self.sweeper.as_ref() {
            sweeper.stop();
            debug!("Cache sweeper stopped");
        }
    }

    fn shared(&self) -> Result<&Arc<Shared<K, V>>> {
        self.shared.as_ref().ok_or(CacheError::Uninitialized)
    }
}
