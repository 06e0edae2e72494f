//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// TTL argument rejected; the cache was left unchanged
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// Mutating call on a cache that was never constructed
    #[error("Cache is not initialized")]
    Uninitialized,

    /// The sweeper needs a Tokio runtime and none is running
    #[error("No Tokio runtime available to run the expiration sweeper")]
    NoRuntime,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
