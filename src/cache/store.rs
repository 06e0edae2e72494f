//! Cache Store Module
//!
//! Single-threaded cache engine: LRU ordering, capacity eviction, TTL checks
//! and the incremental expiration sweep. Locking lives in [`crate::Cache`].

use std::hash::Hash;
use std::mem;
use std::time::Instant;

use tracing::trace;

use crate::cache::{CacheEntry, CacheStats, LruList, Removal, RemovalCause, TtlStatus};

// == Sweep Outcome ==
/// What one sweep pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Entries examined
    pub inspected: usize,
    /// Expired entries reclaimed
    pub reclaimed: usize,
}

// == Cache Store ==
/// Cache storage with LRU eviction and TTL support.
///
/// Entries removed by any path are queued as [`Removal`]s; the owner drains
/// them with [`CacheStore::take_removals`] to run the eviction listener.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Recency-ordered entries
    list: LruList<K, V>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries, 0 = unbounded
    max_entries: usize,
    /// Where the next non-promoting sweep resumes; None = start at the tail
    sweep_cursor: Option<usize>,
    /// Removed entries awaiting listener dispatch
    pending: Vec<Removal<K, V>>,
}

impl<K: Hash + Eq + Clone, V> CacheStore<K, V> {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` entries (0 = no limit).
    pub fn new(max_entries: usize) -> Self {
        let list = if max_entries == 0 {
            LruList::new()
        } else {
            LruList::with_capacity(max_entries)
        };
        Self {
            list,
            stats: CacheStats::new(),
            max_entries,
            sweep_cursor: None,
            pending: Vec::new(),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    // == Set ==
    /// Stores a key-value pair expiring at `expire_at` (None = never).
    ///
    /// An existing key has its value and deadline replaced and is promoted.
    /// A new key goes to the head; if that pushes the size past
    /// `max_entries`, the tail is evicted before returning.
    pub fn set(&mut self, key: K, value: V, expire_at: Option<Instant>) {
        if let Some(slot) = self.list.find(&key) {
            if let Some(entry) = self.list.entry_mut(slot) {
                entry.value = value;
                entry.expire_at = expire_at;
            }
            self.promote(slot);
            self.stats.record_update();
            return;
        }

        self.list.push_front(CacheEntry::new(key, value, expire_at));
        self.stats.record_insertion();

        if self.max_entries != 0 && self.list.len() > self.max_entries {
            if let Some(tail) = self.list.tail() {
                self.remove_slot(tail, RemovalCause::Size);
            }
        }
    }

    // == Get ==
    /// Looks up a live value, promoting it to most recently used.
    ///
    /// An expired entry is reclaimed on the spot and reported as a miss.
    pub fn get(&mut self, key: &K, now: Instant) -> Option<&V> {
        let Some(slot) = self.list.find(key) else {
            self.stats.record_miss();
            return None;
        };

        if self.is_expired(slot, now) {
            self.remove_slot(slot, RemovalCause::Expired);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.promote(slot);
        self.list.entry(slot).map(|entry| &entry.value)
    }

    // == Contains Key ==
    /// True if `key` is present and live. Does not promote.
    pub fn contains_key(&self, key: &K, now: Instant) -> bool {
        self.list
            .find(key)
            .is_some_and(|slot| !self.is_expired(slot, now))
    }

    // == Remove ==
    /// Removes `key` if present. Returns whether anything was removed.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.list.find(key) {
            Some(slot) => self.remove_slot(slot, RemovalCause::Explicit),
            None => false,
        }
    }

    // == Keys ==
    /// Live keys from most to least recently used.
    pub fn keys(&self, now: Instant) -> Vec<K> {
        self.list
            .iter()
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.key.clone())
            .collect()
    }

    // == Flush All ==
    /// Drops every entry, keeping configuration. Returns how many were dropped.
    pub fn flush_all(&mut self) -> usize {
        let drained = self.list.drain();
        let count = drained.len();
        self.sweep_cursor = None;
        for entry in drained {
            self.stats.record_removal(RemovalCause::Flushed);
            self.pending
                .push(Removal::new(entry.key, entry.value, RemovalCause::Flushed));
        }
        count
    }

    // == TTL ==
    pub fn ttl(&self, key: &K, now: Instant) -> TtlStatus {
        self.list
            .find(key)
            .and_then(|slot| self.list.entry(slot))
            .map_or(TtlStatus::NotFound, |entry| entry.ttl_at(now))
    }

    // == Length ==
    /// Number of live entries as of `now`.
    pub fn live_len(&self, now: Instant) -> usize {
        self.list
            .iter()
            .filter(|entry| !entry.is_expired_at(now))
            .count()
    }

    /// Number of stored entries, expired-but-unreclaimed ones included.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.list.len());
        stats
    }

    // == Sweep ==
    /// Examines up to `samples` entries starting from the LRU end and
    /// reclaims the expired ones.
    ///
    /// With `promote_inspected`, every surviving entry examined is moved to
    /// the head, so each pass restarts at the tail. Without it, survivors
    /// stay put and the pass resumes on the next call where this one
    /// stopped, wrapping back to the tail after reaching the head.
    pub fn sweep(&mut self, samples: usize, promote_inspected: bool, now: Instant) -> SweepOutcome {
        let budget = samples.min(self.list.len());
        let mut outcome = SweepOutcome::default();

        if promote_inspected {
            for _ in 0..budget {
                let Some(tail) = self.list.tail() else { break };
                outcome.inspected += 1;
                if self.is_expired(tail, now) {
                    self.remove_slot(tail, RemovalCause::Expired);
                    outcome.reclaimed += 1;
                } else {
                    self.list.touch(tail);
                }
            }
            return outcome;
        }

        let mut cursor = self
            .sweep_cursor
            .take()
            .filter(|&slot| self.list.entry(slot).is_some());
        for _ in 0..budget {
            let Some(slot) = cursor.or_else(|| self.list.tail()) else { break };
            cursor = self.list.prev_of(slot);
            outcome.inspected += 1;
            if self.is_expired(slot, now) {
                self.remove_slot(slot, RemovalCause::Expired);
                outcome.reclaimed += 1;
            }
        }
        self.sweep_cursor = cursor;
        outcome
    }

    // == Take Removals ==
    /// Hands over removals queued since the last call.
    pub fn take_removals(&mut self) -> Vec<Removal<K, V>> {
        mem::take(&mut self.pending)
    }

    fn is_expired(&self, slot: usize, now: Instant) -> bool {
        self.list
            .entry(slot)
            .is_some_and(|entry| entry.is_expired_at(now))
    }

    /// Moves `slot` to the head. A sweep cursor parked on it steps to the
    /// next entry toward the head first, so the walk does not skip ahead.
    fn promote(&mut self, slot: usize) {
        if self.sweep_cursor == Some(slot) {
            self.sweep_cursor = self.list.prev_of(slot);
        }
        self.list.touch(slot);
    }

    /// The single removal path: detaches, counts and queues the entry.
    fn remove_slot(&mut self, slot: usize, cause: RemovalCause) -> bool {
        if self.sweep_cursor == Some(slot) {
            self.sweep_cursor = self.list.prev_of(slot);
        }
        let Some(entry) = self.list.remove(slot) else {
            return false;
        };
        trace!(%cause, "cache entry removed");
        self.stats.record_removal(cause);
        self.pending
            .push(Removal::new(entry.key, entry.value, cause));
        true
    }
}
