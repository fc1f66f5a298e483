//! LRU cache of text embeddings.
//!
//! Embeddings are deterministic per model, so entries never go stale; the
//! cache only bounds memory. Default: 1000 entries.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;

use crate::embedder::Embedding;

/// Thread-safe LRU cache keyed by the exact input text.
pub struct EmbeddingCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<String, Embedding>,
    /// Least recently used at the front.
    order: VecDeque<String>,
    max_size: usize,
}

impl EmbeddingCache {
    /// Create a cache holding at most `max_size` embeddings.
    pub fn new(max_size: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: VecDeque::with_capacity(max_size),
                max_size,
            }),
        }
    }

    pub fn default_cache() -> Self {
        Self::new(1000)
    }

    /// Get a cached embedding and mark it most recently used.
    pub fn get(&self, text: &str) -> Option<Embedding> {
        let mut inner = self.inner.lock();
        let embedding = inner.entries.get(text)?.clone();
        inner.touch(text);
        Some(embedding)
    }

    /// Insert an embedding, evicting the least recently used entry when full.
    pub fn put(&self, text: String, embedding: Embedding) {
        let mut inner = self.inner.lock();
        if inner.max_size == 0 {
            return;
        }

        if inner.entries.insert(text.clone(), embedding).is_some() {
            inner.touch(&text);
            return;
        }

        inner.order.push_back(text);
        while inner.entries.len() > inner.max_size {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}

impl CacheInner {
    fn touch(&mut self, text: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == text) {
            if let Some(key) = self.order.remove(pos) {
                self.order.push_back(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_cache_hit_and_miss() {
        let cache = EmbeddingCache::new(10);
        assert!(cache.get("hello").is_none());

        cache.put("hello".into(), array![1.0, 2.0, 3.0]);
        assert_eq!(cache.get("hello"), Some(array![1.0, 2.0, 3.0]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = EmbeddingCache::new(2);
        cache.put("a".into(), array![1.0]);
        cache.put("b".into(), array![2.0]);

        // Touch "a" so "b" becomes the eviction candidate.
        assert!(cache.get("a").is_some());
        cache.put("c".into(), array![3.0]);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_reinsert_updates_value() {
        let cache = EmbeddingCache::new(2);
        cache.put("a".into(), array![1.0]);
        cache.put("a".into(), array![5.0]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), Some(array![5.0]));
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = EmbeddingCache::new(0);
        cache.put("a".into(), array![1.0]);
        assert!(cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
