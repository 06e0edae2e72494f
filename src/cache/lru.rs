//! LRU List Module
//!
//! Recency-ordered entry storage: a key index over an arena of slots linked
//! into a doubly linked list by index.

use std::collections::HashMap;
use std::hash::Hash;

use crate::cache::CacheEntry;

/// Null link.
const NIL: usize = usize::MAX;

// == Slot ==
#[derive(Debug)]
struct Slot<K, V> {
    /// None while the slot sits on the free list
    entry: Option<CacheEntry<K, V>>,
    /// Neighbour toward the head (more recently used)
    prev: usize,
    /// Neighbour toward the tail (less recently used)
    next: usize,
}

// == LRU List ==
/// Entries ordered by recency, addressable by key.
///
/// - Head = most recently used
/// - Tail = least recently used
///
/// Every key in `index` points at exactly one occupied slot that is linked
/// into the list, and every linked slot is indexed.
#[derive(Debug)]
pub struct LruList<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<Slot<K, V>>,
    head: usize,
    tail: usize,
    /// Free-list head, chained through `next`
    free: usize,
}

impl<K, V> Default for LruList<K, V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            slots: Vec::new(),
            head: NIL,
            tail: NIL,
            free: NIL,
        }
    }
}

impl<K: Hash + Eq + Clone, V> LruList<K, V> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Lookup ==
    /// Returns the slot holding `key`.
    pub fn find(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Returns the entry at an occupied slot.
    pub fn entry(&self, slot: usize) -> Option<&CacheEntry<K, V>> {
        self.slots.get(slot).and_then(|s| s.entry.as_ref())
    }

    pub fn entry_mut(&mut self, slot: usize) -> Option<&mut CacheEntry<K, V>> {
        self.slots.get_mut(slot).and_then(|s| s.entry.as_mut())
    }

    /// Least recently used slot.
    pub fn tail(&self) -> Option<usize> {
        (self.tail != NIL).then_some(self.tail)
    }

    /// The slot one step closer to the head than `slot`.
    pub fn prev_of(&self, slot: usize) -> Option<usize> {
        self.slots
            .get(slot)
            .map(|s| s.prev)
            .filter(|&prev| prev != NIL)
    }

    // == Push Front ==
    /// Inserts a new entry at the head and indexes it.
    ///
    /// The key must not already be present.
    pub fn push_front(&mut self, entry: CacheEntry<K, V>) -> usize {
        debug_assert!(!self.index.contains_key(&entry.key));
        let key = entry.key.clone();
        let slot = self.alloc(entry);
        self.link_front(slot);
        self.index.insert(key, slot);
        slot
    }

    // == Touch ==
    /// Marks a slot as most recently used (moves it to the head).
    pub fn touch(&mut self, slot: usize) {
        if slot == self.head || self.entry(slot).is_none() {
            return;
        }
        self.unlink(slot);
        self.link_front(slot);
    }

    // == Remove ==
    /// Detaches a slot from the list and index, returning its entry.
    pub fn remove(&mut self, slot: usize) -> Option<CacheEntry<K, V>> {
        let entry = self.slots.get_mut(slot)?.entry.take()?;
        self.unlink(slot);
        self.index.remove(&entry.key);
        self.slots[slot].next = self.free;
        self.free = slot;
        Some(entry)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    pub fn pop_back(&mut self) -> Option<CacheEntry<K, V>> {
        let tail = self.tail()?;
        self.remove(tail)
    }

    // == Drain ==
    /// Empties the list, returning every entry from head to tail.
    pub fn drain(&mut self) -> Vec<CacheEntry<K, V>> {
        let mut drained = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while cursor != NIL {
            let slot = &mut self.slots[cursor];
            cursor = slot.next;
            if let Some(entry) = slot.entry.take() {
                drained.push(entry);
            }
        }
        self.index.clear();
        self.slots.clear();
        self.head = NIL;
        self.tail = NIL;
        self.free = NIL;
        drained
    }

    // == Iter ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn alloc(&mut self, entry: CacheEntry<K, V>) -> usize {
        if self.free != NIL {
            let slot = self.free;
            self.free = self.slots[slot].next;
            self.slots[slot] = Slot {
                entry: Some(entry),
                prev: NIL,
                next: NIL,
            };
            slot
        } else {
            self.slots.push(Slot {
                entry: Some(entry),
                prev: NIL,
                next: NIL,
            });
            self.slots.len() - 1
        }
    }

    fn link_front(&mut self, slot: usize) {
        self.slots[slot].prev = NIL;
        self.slots[slot].next = self.head;
        if self.head != NIL {
            self.slots[self.head].prev = slot;
        }
        self.head = slot;
        if self.tail == NIL {
            self.tail = slot;
        }
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.slots[slot].prev, self.slots[slot].next);
        if prev != NIL {
            self.slots[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.slots[next].prev = prev;
        } else {
            self.tail = prev;
        }
        self.slots[slot].prev = NIL;
        self.slots[slot].next = NIL;
    }
}

// == Iterator ==
pub struct Iter<'a, K, V> {
    list: &'a LruList<K, V>,
    cursor: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a CacheEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor != NIL {
            let slot = &self.list.slots[self.cursor];
            self.cursor = slot.next;
            if let Some(entry) = slot.entry.as_ref() {
                return Some(entry);
            }
        }
        None
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn push(list: &mut LruList<String, u32>, key: &str) -> usize {
        list.push_front(CacheEntry::new(key.to_string(), 0, None))
    }

    fn order(list: &LruList<String, u32>) -> Vec<String> {
        list.iter().map(|e| e.key.clone()).collect()
    }

    #[test]
    fn test_lru_new() {
        let list: LruList<String, u32> = LruList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.tail(), None);
    }

    #[test]
    fn test_push_front_orders_newest_first() {
        let mut list = LruList::new();
        push(&mut list, "key1");
        push(&mut list, "key2");
        push(&mut list, "key3");

        assert_eq!(list.len(), 3);
        assert_eq!(order(&list), vec!["key3", "key2", "key1"]);
        let tail = list.tail().unwrap();
        assert_eq!(list.entry(tail).unwrap().key, "key1");
    }

    #[test]
    fn test_touch_moves_to_front() {
        let mut list = LruList::new();
        let a = push(&mut list, "a");
        push(&mut list, "b");
        push(&mut list, "c");

        list.touch(a);

        assert_eq!(order(&list), vec!["a", "c", "b"]);
        assert_eq!(list.entry(list.tail().unwrap()).unwrap().key, "b");
    }

    #[test]
    fn test_order_after_multiple_touches() {
        let mut list = LruList::new();
        let a = push(&mut list, "a");
        let b = push(&mut list, "b");
        let c = push(&mut list, "c");

        list.touch(a);
        list.touch(c);
        list.touch(b);

        assert_eq!(list.pop_back().unwrap().key, "a");
        assert_eq!(list.pop_back().unwrap().key, "c");
        assert_eq!(list.pop_back().unwrap().key, "b");
        assert!(list.pop_back().is_none());
    }

    #[test]
    fn test_touch_head_is_noop() {
        let mut list = LruList::new();
        push(&mut list, "a");
        let b = push(&mut list, "b");

        list.touch(b);
        assert_eq!(order(&list), vec!["b", "a"]);
    }

    #[test]
    fn test_remove_middle_keeps_links() {
        let mut list = LruList::new();
        push(&mut list, "key1");
        let key2 = push(&mut list, "key2");
        push(&mut list, "key3");

        let removed = list.remove(key2).unwrap();

        assert_eq!(removed.key, "key2");
        assert_eq!(list.len(), 2);
        assert_eq!(list.find(&"key2".to_string()), None);
        assert_eq!(order(&list), vec!["key3", "key1"]);
    }

    #[test]
    fn test_remove_twice_returns_none() {
        let mut list = LruList::new();
        let slot = push(&mut list, "a");

        assert!(list.remove(slot).is_some());
        assert!(list.remove(slot).is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut list = LruList::new();
        let a = push(&mut list, "a");
        push(&mut list, "b");
        list.remove(a);

        let c = push(&mut list, "c");
        assert_eq!(c, a);
        assert_eq!(order(&list), vec!["c", "b"]);
        assert_eq!(list.find(&"c".to_string()), Some(c));
    }

    #[test]
    fn test_prev_of_walks_toward_head() {
        let mut list = LruList::new();
        let a = push(&mut list, "a");
        let b = push(&mut list, "b");
        let c = push(&mut list, "c");

        assert_eq!(list.prev_of(a), Some(b));
        assert_eq!(list.prev_of(b), Some(c));
        assert_eq!(list.prev_of(c), None);
    }

    #[test]
    fn test_drain_returns_head_to_tail() {
        let mut list = LruList::new();
        push(&mut list, "a");
        push(&mut list, "b");

        let drained: Vec<String> = list.drain().into_iter().map(|e| e.key).collect();
        assert_eq!(drained, vec!["b", "a"]);
        assert!(list.is_empty());

        push(&mut list, "c");
        assert_eq!(order(&list), vec!["c"]);
    }
}
