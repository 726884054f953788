/// Bounded map evicting the least recently used entry.
///
/// Every `get` or `insert` stamps the entry with a fresh tick; an ordered
/// index from tick to key gives the eviction candidate in `O(log n)`.
///
/// # Example
///
/// ```ignore
/// let mut cache = LruCache::new(2);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.get(&"a");           // "a" is now most recent
/// cache.insert("c", 3);      // evicts "b"
/// ```

use std::collections::BTreeMap;
use std::hash::Hash;
use rustc_hash::FxHashMap;

pub struct LruCache<K, V> {
    entries: FxHashMap<K, (V, u64)>,
    order: BTreeMap<u64, K>,
    capacity: usize,
    tick: u64,
    hits: u64,
    misses: u64,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Create an empty cache holding at most `capacity` entries (min 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            order: BTreeMap::new(),
            capacity: capacity.max(1),
            tick: 0,
            hits: 0,
            misses: 0,
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Look up `key`, marking it most recently used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let tick = self.tick + 1;
        match self.entries.get_mut(key) {
            Some((_, stamp)) => {
                self.order.remove(stamp);
                *stamp = tick;
                self.order.insert(tick, key.clone());
                self.tick = tick;
                self.hits += 1;
                self.entries.get(key).map(|(value, _)| value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Look up without touching recency or counters
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|(value, _)| value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace `key`.
    ///
    /// Returns the evicted least-recently-used entry when the cache was full.
    /// Replacing an existing key never evicts.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        let tick = self.next_tick();
        if let Some((old_value, stamp)) = self.entries.get_mut(&key) {
            self.order.remove(stamp);
            *old_value = value;
            *stamp = tick;
            self.order.insert(tick, key);
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.pop_oldest()
        } else {
            None
        };
        self.order.insert(tick, key.clone());
        self.entries.insert(key, (value, tick));
        evicted
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (value, stamp) = self.entries.remove(key)?;
        self.order.remove(&stamp);
        Some(value)
    }

    fn pop_oldest(&mut self) -> Option<(K, V)> {
        let (_, key) = self.order.pop_first()?;
        let (value, _) = self.entries.remove(&key)?;
        Some((key, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Successful `get` calls since creation
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Failed `get` calls since creation
    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
#[path = "lru_cache_tests.rs"]
mod tests;
