use anyhow::Result;
use cached::{Cached, TimedCache};
use parking_lot::Mutex;
use std::hash::Hash;

/// Memo table for one accessor. Only successful results are kept.
pub(crate) struct Memo<K, V> {
    name: &'static str,
    store: Mutex<TimedCache<K, V>>,
}

impl<K: Hash + Eq + Clone, V: Clone> Memo<K, V> {
    pub fn new(name: &'static str, lifespan: u64) -> Self {
        Self { name, store: Mutex::new(TimedCache::with_lifespan(lifespan)) }
    }

    pub fn get_or_try_insert(&self, key: K, f: impl FnOnce() -> Result<V>) -> Result<V> {
        // lock is released before `f` runs
        let hit = self.store.lock().cache_get(&key).cloned();
        if let Some(value) = hit {
            tracing::debug!(cache = self.name, "cache hit");
            return Ok(value);
        }

        let value = f()?;

        // expired entries are otherwise only dropped when their own key comes back
        let mut store = self.store.lock();
        store.flush();
        store.cache_set(key, value.clone());

        Ok(value)
    }

    pub fn clear(&self) {
        self.store.lock().cache_clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.store.lock().cache_size()
    }
}
