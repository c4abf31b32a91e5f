//! An insertion-ordered, self-balancing associative container.
//!
//! [`OrderedMap`] hashes each key into one of a power-of-two number of
//! buckets, the way a conventional hash table would, but resolves
//! collisions within a bucket with a small AVL tree ordered by `K: Ord`
//! rather than a linked list, so a bucket with many collisions still
//! resolves lookups in O(log n). A doubly linked list threaded through the
//! same nodes preserves insertion order for iteration, independent of how
//! entries are bucketed.
//!
//! Growing the table doubles its capacity and redistributes every bucket's
//! tree in O(n) total, without re-comparing any two keys; see
//! [`rehash`] for how.

mod avl;
mod iter;
mod node;
mod rehash;
mod remove;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use node::{Arena, NodeId};

pub use iter::{IntoIter, Iter, Keys, Values};

const DEFAULT_CAPACITY: usize = 16;

pub struct OrderedMap<K, V> {
    arena: Arena<K, V>,
    table: Vec<Option<NodeId>>,
    size: usize,
    threshold: usize,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl<K, V> OrderedMap<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a map whose bucket table can hold `capacity` entries before
    /// its first resize. Rounded up to the next power of two.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        OrderedMap {
            arena: Arena::new(),
            table: vec![None; capacity],
            size: 0,
            threshold: capacity * 3 / 4,
            head: None,
            tail: None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn clear(&mut self) {
        let capacity = self.table.len();
        *self = Self::with_capacity(capacity);
    }

    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { map: self, next: self.head, remaining: self.size }
    }

    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    fn hash_of(key: &K) -> u32
    where
        K: Hash,
    {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        secondary_hash(hasher.finish() as u32)
    }

    fn bucket_for_id(&self, id: NodeId) -> usize {
        (self.arena.get(id).hash & (self.table.len() as u32 - 1)) as usize
    }
}

impl<K: Ord + Hash, V> OrderedMap<K, V> {
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|(_, id)| &self.arena.get(id).value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let (_, id) = self.find(key)?;
        Some(&mut self.arena.get_mut(id).value)
    }
}

impl<K: Ord + Hash, V> OrderedMap<K, V> {
    /// Insert `key`/`value`. Returns the prior value if `key` was already
    /// present, in which case its position in iteration order is
    /// unchanged; a genuinely new key is always appended.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.avl_insert(key, value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (bucket, id) = self.find(key)?;
        Some(self.remove_entry(bucket, id))
    }

    /// Visit every entry in insertion order, dropping those for which `f`
    /// returns `false`. The Rust equivalent of driving a mutable iterator
    /// to completion and calling `remove()` along the way.
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        let mut current = self.head;
        while let Some(id) = current {
            current = self.arena.get(id).next;
            let keep = {
                let node = self.arena.get_mut(id);
                f(&node.key, &mut node.value)
            };
            if !keep {
                let bucket = self.bucket_for_id(id);
                self.remove_entry(bucket, id);
            }
        }
    }
}

/// Doug Lea's supplemental hash spreader, as used by `HashMap`/
/// `LinkedHashTreeMap` in the JDK: spreads a hash's high bits down into its
/// low ones, since the bucket index only ever looks at the low bits of a
/// power-of-two-sized table.
fn secondary_hash(hash_code: u32) -> u32 {
    let h = hash_code ^ (hash_code >> 20) ^ (hash_code >> 12);
    h ^ (h >> 7) ^ (h >> 4)
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { map: self }
    }
}

impl<K: Ord + Hash, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord + Hash, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
