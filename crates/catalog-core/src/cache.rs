//! Bounded result cache with optional time-to-live.
//!
//! Eviction is by insertion order: when full, the entry inserted earliest is
//! dropped. Reads do not refresh an entry's position, and re-setting an
//! existing key keeps its position while resetting its timestamp.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

use crate::traits::Clock;

#[derive(Clone, Debug)]
pub struct CacheEntry<K, V> {
    pub key: K,
    pub value: V,
    pub inserted_at_millis: i64,
}

pub struct ResultCache<K, V> {
    entries: HashMap<K, CacheEntry<K, V>>,
    // insertion order, oldest first
    order: VecDeque<K>,
    capacity: usize,
    ttl_millis: Option<i64>,
    clock: Arc<dyn Clock>,
}

impl<K, V> ResultCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize, ttl_millis: Option<i64>, clock: Arc<dyn Clock>) -> Self {
        Self { entries: HashMap::new(), order: VecDeque::new(), capacity, ttl_millis, clock }
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        let inserted_at = self.entries.get(key)?.inserted_at_millis;
        if let Some(ttl) = self.ttl_millis {
            if self.clock.now_millis() - inserted_at > ttl {
                self.remove(key);
                return None;
            }
        }
        self.entries.get(key).map(|e| e.value.clone())
    }

    pub fn set(&mut self, key: K, value: V) {
        if self.capacity == 0 { return; }
        let now = self.clock.now_millis();
        if let Some(existing) = self.entries.get_mut(&key) {
            existing.value = value;
            existing.inserted_at_millis = now;
            return;
        }
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => { self.entries.remove(&oldest); }
                None => break,
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key.clone(), CacheEntry { key, value, inserted_at_millis: now });
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(entry.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn capacity(&self) -> usize { self.capacity }
}

impl<K, V> std::fmt::Debug for ResultCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("ttl_millis", &self.ttl_millis)
            .finish()
    }
}
