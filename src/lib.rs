//! ttl_lru - A bounded in-process LRU cache with TTL expiration
//!
//! Entries are evicted least-recently-used first once `max_entries` is
//! exceeded, and may carry a time-to-live. A background sweeper reclaims
//! expired entries in bounded batches; reads never return them.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, RemovalCause, TtlStatus};
pub use config::{CacheConfig, SweepConfig};
pub use error::{CacheError, Result};
