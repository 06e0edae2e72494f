//! Eviction Listener Module
//!
//! Notification hook invoked once for every entry that leaves the cache.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

// == Removal Cause ==
/// Why an entry left the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalCause {
    /// Evicted as least recently used to honor `max_entries`
    Size,
    /// TTL elapsed; reclaimed on read or by the sweeper
    Expired,
    /// Removed by a caller through `remove`
    Explicit,
    /// Dropped by `flush_all`
    Flushed,
}

impl RemovalCause {
    /// True for removals the cache decided on by itself.
    pub fn was_evicted(&self) -> bool {
        matches!(self, RemovalCause::Size | RemovalCause::Expired)
    }
}

impl fmt::Display for RemovalCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemovalCause::Size => "size",
            RemovalCause::Expired => "expired",
            RemovalCause::Explicit => "explicit",
            RemovalCause::Flushed => "flushed",
        };
        f.write_str(name)
    }
}

/// Callback receiving the removed key, value and cause.
pub type EvictionListener<K, V> = Arc<dyn Fn(K, V, RemovalCause) + Send + Sync + 'static>;

// == Removal ==
/// An entry taken out of the cache whose listener call is still pending.
#[derive(Debug)]
pub struct Removal<K, V> {
    pub key: K,
    pub value: V,
    pub cause: RemovalCause,
}

impl<K, V> Removal<K, V> {
    pub fn new(key: K, value: V, cause: RemovalCause) -> Self {
        Self { key, value, cause }
    }
}

/// Hands each removal to the listener, in order.
pub fn notify_all<K, V>(listener: Option<&EvictionListener<K, V>>, removals: Vec<Removal<K, V>>) {
    if let Some(listener) = listener {
        for Removal { key, value, cause } in removals {
            listener(key, value, cause);
        }
    }
}
