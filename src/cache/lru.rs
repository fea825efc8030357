//! LRU Index Module
//!
//! Recency-ordered index of resident entries.
//!
//! Entries live in a `Vec` arena and are linked through `prev`/`next`
//! indices, so move-to-front and pop-back are O(1) without raw pointers.
//! A `HashMap` maps each key to its arena slot. Freed slots are chained
//! through `next` and reused on the next insert.

use std::collections::HashMap;

use crate::cache::Entry;

/// Null link.
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node {
    entry: Option<Entry>,
    prev: usize,
    next: usize,
}

// == LRU Index ==
/// Tracks resident entries in recency order.
///
/// - Head = Most recently used
/// - Tail = Least recently used
#[derive(Debug)]
pub struct LruIndex {
    slots: HashMap<String, usize>,
    arena: Vec<Node>,
    head: usize,
    tail: usize,
    free: usize,
    /// Sum of `size` over all indexed entries
    total_size: u64,
}

impl Default for LruIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl LruIndex {
    // == Constructor ==
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            arena: Vec::new(),
            head: NIL,
            tail: NIL,
            free: NIL,
            total_size: 0,
        }
    }

    // == Push Front ==
    /// Inserts an entry as most recently used.
    ///
    /// An existing entry with the same key is replaced and returned.
    pub fn push_front(&mut self, entry: Entry) -> Option<Entry> {
        let replaced = self.remove(&entry.key);

        let key = entry.key.clone();
        self.total_size += entry.size;
        let idx = self.alloc(entry);
        self.link_front(idx);
        self.slots.insert(key, idx);

        replaced
    }

    // == Touch ==
    /// Marks a key as recently used (moves to front) and returns its entry.
    pub fn touch(&mut self, key: &str) -> Option<&Entry> {
        let idx = *self.slots.get(key)?;
        if self.head != idx {
            self.unlink(idx);
            self.link_front(idx);
        }
        self.arena[idx].entry.as_ref()
    }

    // == Get ==
    /// Returns the entry for a key without changing its recency.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.slots
            .get(key)
            .and_then(|&idx| self.arena[idx].entry.as_ref())
    }

    // == Remove ==
    /// Removes a key from the index, returning its entry.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        let idx = self.slots.remove(key)?;
        self.release(idx)
    }

    // == Peek Oldest ==
    /// Returns the least recently used entry without removing it.
    pub fn peek_oldest(&self) -> Option<&Entry> {
        if self.tail == NIL {
            None
        } else {
            self.arena[self.tail].entry.as_ref()
        }
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently used entry.
    pub fn pop_oldest(&mut self) -> Option<Entry> {
        if self.tail == NIL {
            return None;
        }
        let idx = self.tail;
        let key = self.arena[idx].entry.as_ref()?.key.clone();
        self.slots.remove(&key);
        self.release(idx)
    }

    // == Keys ==
    /// Returns all keys, most recently used first.
    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            arena: &self.arena,
            current: self.head,
        }
    }

    // == Length ==
    /// Returns the number of indexed entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    // == Contains ==
    /// Checks if a key is indexed, without changing its recency.
    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    // == Total Size ==
    /// Sum of the sizes of all indexed entries.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    // == Arena Links ==

    fn alloc(&mut self, entry: Entry) -> usize {
        let node = Node {
            entry: Some(entry),
            prev: NIL,
            next: NIL,
        };
        if self.free == NIL {
            self.arena.push(node);
            self.arena.len() - 1
        } else {
            let idx = self.free;
            self.free = self.arena[idx].next;
            self.arena[idx] = node;
            idx
        }
    }

    /// Unlinks a slot whose key was already dropped from `slots`, and frees it.
    fn release(&mut self, idx: usize) -> Option<Entry> {
        self.unlink(idx);
        let node = &mut self.arena[idx];
        let entry = node.entry.take()?;
        node.next = self.free;
        self.free = idx;
        self.total_size -= entry.size;
        Some(entry)
    }

    fn link_front(&mut self, idx: usize) {
        self.arena[idx].prev = NIL;
        self.arena[idx].next = self.head;
        if self.head != NIL {
            self.arena[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.arena[idx].prev, self.arena[idx].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.arena[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.arena[next].prev = prev;
        }
        self.arena[idx].prev = NIL;
        self.arena[idx].next = NIL;
    }
}

/// Iterator over entries in recency order, see [`LruIndex::iter`].
pub struct Iter<'a> {
    arena: &'a [Node],
    current: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NIL {
            return None;
        }
        let node = &self.arena[self.current];
        self.current = node.next;
        node.entry.as_ref()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, size: u64) -> Entry {
        Entry::new(key, format!("/cache/{}", key), size)
    }

    #[test]
    fn test_index_new() {
        let index = LruIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.total_size(), 0);
        assert!(index.peek_oldest().is_none());
    }

    #[test]
    fn test_push_front_orders_newest_first() {
        let mut index = LruIndex::new();

        index.push_front(entry("a", 6));
        index.push_front(entry("b", 1));
        index.push_front(entry("c", 1));

        assert_eq!(index.keys(), vec!["c", "b", "a"]);
        assert_eq!(index.total_size(), 8);
        assert_eq!(index.peek_oldest().map(|e| e.key.as_str()), Some("a"));
    }

    #[test]
    fn test_push_front_replaces_existing_key() {
        let mut index = LruIndex::new();

        index.push_front(entry("a", 3));
        index.push_front(entry("b", 1));
        let replaced = index.push_front(entry("a", 4));

        assert_eq!(replaced, Some(entry("a", 3)));
        assert_eq!(index.len(), 2);
        assert_eq!(index.keys(), vec!["a", "b"]);
        // Old size is not double counted
        assert_eq!(index.total_size(), 5);
    }

    #[test]
    fn test_touch_moves_to_front() {
        let mut index = LruIndex::new();

        index.push_front(entry("a", 1));
        index.push_front(entry("b", 1));
        index.push_front(entry("c", 1));

        assert_eq!(index.touch("a").map(|e| e.size), Some(1));
        assert_eq!(index.keys(), vec!["a", "c", "b"]);
        assert_eq!(index.peek_oldest().map(|e| e.key.as_str()), Some("b"));

        // Touching the head is a no-op on order
        index.touch("a");
        assert_eq!(index.keys(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_touch_missing_key() {
        let mut index = LruIndex::new();
        index.push_front(entry("a", 1));

        assert!(index.touch("nope").is_none());
        assert_eq!(index.keys(), vec!["a"]);
    }

    #[test]
    fn test_get_does_not_promote() {
        let mut index = LruIndex::new();
        index.push_front(entry("a", 1));
        index.push_front(entry("b", 1));

        assert_eq!(index.get("a"), Some(&entry("a", 1)));
        assert_eq!(index.keys(), vec!["b", "a"]);
    }

    #[test]
    fn test_pop_oldest() {
        let mut index = LruIndex::new();

        index.push_front(entry("a", 2));
        index.push_front(entry("b", 3));
        index.push_front(entry("c", 4));

        assert_eq!(index.pop_oldest(), Some(entry("a", 2)));
        assert_eq!(index.total_size(), 7);
        assert_eq!(index.pop_oldest(), Some(entry("b", 3)));
        assert_eq!(index.pop_oldest(), Some(entry("c", 4)));
        assert_eq!(index.pop_oldest(), None);
        assert!(index.is_empty());
        assert_eq!(index.total_size(), 0);
    }

    #[test]
    fn test_remove_middle_keeps_links() {
        let mut index = LruIndex::new();

        index.push_front(entry("a", 1));
        index.push_front(entry("b", 1));
        index.push_front(entry("c", 1));

        assert_eq!(index.remove("b"), Some(entry("b", 1)));
        assert_eq!(index.keys(), vec!["c", "a"]);
        assert!(!index.contains("b"));
        assert_eq!(index.remove("b"), None);

        assert_eq!(index.pop_oldest().map(|e| e.key), Some("a".to_string()));
        assert_eq!(index.pop_oldest().map(|e| e.key), Some("c".to_string()));
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut index = LruIndex::new();

        index.push_front(entry("a", 1));
        index.push_front(entry("b", 1));
        index.remove("a");
        index.remove("b");
        index.push_front(entry("c", 1));
        index.push_front(entry("d", 1));

        assert_eq!(index.arena.len(), 2);
        assert_eq!(index.keys(), vec!["d", "c"]);
    }

    #[test]
    fn test_order_after_multiple_touches() {
        let mut index = LruIndex::new();

        index.push_front(entry("a", 1));
        index.push_front(entry("b", 1));
        index.push_front(entry("c", 1));

        // [a, c, b] -> [c, a, b] -> [b, c, a]
        index.touch("a");
        index.touch("c");
        index.touch("b");

        assert_eq!(index.pop_oldest().map(|e| e.key), Some("a".to_string()));
        assert_eq!(index.pop_oldest().map(|e| e.key), Some("c".to_string()));
        assert_eq!(index.pop_oldest().map(|e| e.key), Some("b".to_string()));
    }
}
