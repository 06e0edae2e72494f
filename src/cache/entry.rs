//! Cache Entry Module
//!
//! Defines individual cache entries and the TTL model they carry.

use std::time::{Duration, Instant};

use crate::error::{CacheError, Result};

// == Cache Entry ==
/// A single cached key/value pair with an optional deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The key this entry is indexed under
    pub key: K,
    /// The stored value
    pub value: V,
    /// Absolute expiration instant, None = no expiration
    pub expire_at: Option<Instant>,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new entry expiring at `expire_at`, or never if `None`.
    pub fn new(key: K, value: V, expire_at: Option<Instant>) -> Self {
        Self {
            key,
            value,
            expire_at,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is expired as of `now`.
    ///
    /// An entry without a deadline never expires. An entry with a deadline
    /// is expired once `now` is strictly past it.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expire_at {
            Some(deadline) => deadline < now,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the TTL status of this entry as seen at `now`.
    pub fn ttl_at(&self, now: Instant) -> TtlStatus {
        match self.expire_at {
            None => TtlStatus::NoExpiry,
            Some(_) if self.is_expired_at(now) => TtlStatus::NotFound,
            Some(deadline) => TtlStatus::Expires(deadline.saturating_duration_since(now)),
        }
    }
}

// == TTL Status ==
/// Result of a TTL query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlStatus {
    /// Key is absent, or logically expired and not yet reclaimed
    NotFound,
    /// Key is present and never expires
    NoExpiry,
    /// Key is present and expires after the contained duration
    Expires(Duration),
}

impl TtlStatus {
    /// Integer encoding of the status: `-2` not found, `-1` no expiry,
    /// otherwise the remaining whole seconds (floored, never negative).
    pub fn as_secs_code(&self) -> i64 {
        match self {
            TtlStatus::NotFound => -2,
            TtlStatus::NoExpiry => -1,
            TtlStatus::Expires(remaining) => {
                i64::try_from(remaining.as_secs()).unwrap_or(i64::MAX)
            }
        }
    }
}

impl From<TtlStatus> for i64 {
    fn from(status: TtlStatus) -> Self {
        status.as_secs_code()
    }
}

// == TTL Validation ==
/// Turns a requested TTL into an absolute deadline.
///
/// A zero TTL is rejected; it is neither "no expiration" nor "expire now".
pub fn deadline_after(now: Instant, ttl: Duration) -> Result<Instant> {
    if ttl.is_zero() {
        return Err(CacheError::InvalidTtl(
            "expire time should be > 0".to_string(),
        ));
    }
    now.checked_add(ttl)
        .ok_or_else(|| CacheError::InvalidTtl(format!("expire time {:?} is out of range", ttl)))
}

/// Validates a TTL given as signed whole seconds.
pub fn ttl_from_secs(seconds: i64) -> Result<Duration> {
    if seconds <= 0 {
        return Err(CacheError::InvalidTtl(format!(
            "expire time should be > 0, got {}",
            seconds
        )));
    }
    Ok(Duration::from_secs(seconds.unsigned_abs()))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_without_deadline_never_expires() {
        let entry = CacheEntry::new("k", 1, None);
        let far_future = Instant::now() + Duration::from_secs(86_400 * 365);

        assert!(!entry.is_expired_at(far_future));
        assert_eq!(entry.ttl_at(far_future), TtlStatus::NoExpiry);
    }

    #[test]
    fn test_entry_expires_strictly_after_deadline() {
        let now = Instant::now();
        let entry = CacheEntry::new("k", 1, Some(now));

        // Deadline equal to now is not yet expired
        assert!(!entry.is_expired_at(now));
        assert!(entry.is_expired_at(now + Duration::from_nanos(1)));
    }

    #[test]
    fn test_ttl_remaining_floors_to_seconds() {
        let now = Instant::now();
        let entry = CacheEntry::new("k", 1, Some(now + Duration::from_millis(2_900)));

        let status = entry.ttl_at(now);
        assert_eq!(status, TtlStatus::Expires(Duration::from_millis(2_900)));
        assert_eq!(status.as_secs_code(), 2);
    }

    #[test]
    fn test_ttl_of_expired_entry_is_not_found() {
        let now = Instant::now();
        let entry = CacheEntry::new("k", 1, Some(now));

        assert_eq!(entry.ttl_at(now + Duration::from_secs(1)), TtlStatus::NotFound);
    }

    #[test]
    fn test_ttl_status_codes() {
        assert_eq!(i64::from(TtlStatus::NotFound), -2);
        assert_eq!(i64::from(TtlStatus::NoExpiry), -1);
        assert_eq!(i64::from(TtlStatus::Expires(Duration::from_millis(400))), 0);
        assert_eq!(i64::from(TtlStatus::Expires(Duration::from_secs(7))), 7);
    }

    #[test]
    fn test_deadline_after_rejects_zero() {
        let result = deadline_after(Instant::now(), Duration::ZERO);
        assert!(matches!(result, Err(CacheError::InvalidTtl(_))));
    }

    #[test]
    fn test_deadline_after_accepts_positive() {
        let now = Instant::now();
        let deadline = deadline_after(now, Duration::from_secs(5)).unwrap();
        assert_eq!(deadline - now, Duration::from_secs(5));
    }

    #[test]
    fn test_ttl_from_secs_validation() {
        assert!(matches!(ttl_from_secs(0), Err(CacheError::InvalidTtl(_))));
        assert!(matches!(ttl_from_secs(-5), Err(CacheError::InvalidTtl(_))));
        assert_eq!(ttl_from_secs(3).unwrap(), Duration::from_secs(3));
    }
}
