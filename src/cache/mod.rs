//! Cache Module
//!
//! In-memory LRU cache with per-entry TTL expiration.

mod entry;
mod listener;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, TtlStatus};
pub use listener::{EvictionListener, Removal, RemovalCause};
pub use lru::LruList;
pub use shared::Cache;
pub(crate) use shared::Shared;
pub use stats::CacheStats;
pub use store::{CacheStore, SweepOutcome};
