//! Memoized descriptor embeddings.
//!
//! Keyed by the exact ordered sequence of descriptor strings, so any change
//! to a taxonomy (added, removed, reordered or reworded categories) is a new
//! key. Entries are never mutated once stored. The cache holds at most
//! `max_size` matrices and evicts the least recently used one beyond that.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use mailsort_core::Result;
use ndarray::Array2;
use parking_lot::Mutex;

/// Default number of taxonomies kept embedded.
pub const DEFAULT_CAPACITY: usize = 64;

/// Thread-safe LRU cache of descriptor embedding matrices (categories x dim).
pub struct DescriptorCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<Vec<String>, Arc<Array2<f32>>>,
    /// Least recently used at the front.
    order: VecDeque<Vec<String>>,
    max_size: usize,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A cache holding at most `max_size` matrices. Zero disables caching.
    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
                max_size,
            }),
        }
    }

    /// Return the cached matrix for `descriptors`, computing it on a miss.
    ///
    /// The computation runs outside the lock. A failed computation caches
    /// nothing. If two callers race on the same key, the first stored
    /// matrix wins and both receive it.
    pub fn get_or_compute<F>(&self, descriptors: &[&str], compute: F) -> Result<Arc<Array2<f32>>>
    where
        F: FnOnce() -> Result<Array2<f32>>,
    {
        let key: Vec<String> = descriptors.iter().map(|d| d.to_string()).collect();
        {
            let mut inner = self.inner.lock();
            if let Some(hit) = inner.entries.get(&key).cloned() {
                inner.touch(&key);
                return Ok(hit);
            }
        }

        let matrix = Arc::new(compute()?);
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.entries.get(&key).cloned() {
            inner.touch(&key);
            return Ok(existing);
        }
        inner.insert(key, matrix.clone());
        Ok(matrix)
    }

    pub fn contains(&self, descriptors: &[&str]) -> bool {
        let key: Vec<String> = descriptors.iter().map(|d| d.to_string()).collect();
        self.inner.lock().entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DescriptorCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheInner {
    fn touch(&mut self, key: &[String]) {
        if let Some(pos) = self.order.iter().position(|k| k.as_slice() == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }

    fn insert(&mut self, key: Vec<String>, matrix: Arc<Array2<f32>>) {
        if self.max_size == 0 {
            return;
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, matrix);
        while self.entries.len() > self.max_size {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }
}
