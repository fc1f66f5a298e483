//! Lazily constructed embedding backend.
//!
//! Wraps a loader closure behind a `OnceCell`: the first call to any
//! embedding method runs the loader, every later call reuses its result.
//! Concurrent first callers block on the same initialization, so the loader
//! runs at most once per `LazyEmbedder`. A failed load is remembered and
//! reported as `ModelUnavailable` on every subsequent call.

use std::sync::Arc;

use mailsort_core::{Error, Result};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::embedder::{EmbedderBackend, Embedding};

type Loader = Box<dyn Fn() -> Result<Arc<dyn EmbedderBackend>> + Send + Sync>;

pub struct LazyEmbedder {
    model_name: String,
    dimension: usize,
    loader: Loader,
    cell: OnceCell<std::result::Result<Arc<dyn EmbedderBackend>, String>>,
}

impl LazyEmbedder {
    /// `model_name` and `dimension` are reported until the model is loaded.
    pub fn new<F>(model_name: impl Into<String>, dimension: usize, loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn EmbedderBackend>> + Send + Sync + 'static,
    {
        Self {
            model_name: model_name.into(),
            dimension,
            loader: Box::new(loader),
            cell: OnceCell::new(),
        }
    }

    /// Load the backend now if it has not been loaded yet.
    pub fn get(&self) -> Result<&Arc<dyn EmbedderBackend>> {
        let loaded = self.cell.get_or_init(|| {
            info!("Loading embedding model {}", self.model_name);
            (self.loader)().map_err(|e| {
                warn!("Embedding model {} failed to load: {}", self.model_name, e);
                match e {
                    Error::ModelUnavailable(msg) => msg,
                    other => other.to_string(),
                }
            })
        });
        loaded
            .as_ref()
            .map_err(|msg| Error::ModelUnavailable(msg.clone()))
    }

    /// Whether a load has been attempted, successful or not.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl EmbedderBackend for LazyEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding> {
        self.get()?.embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        self.get()?.embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        match self.cell.get() {
            Some(Ok(inner)) => inner.dimension(),
            _ => self.dimension,
        }
    }

    fn model_name(&self) -> &str {
        match self.cell.get() {
            Some(Ok(inner)) => inner.model_name(),
            _ => &self.model_name,
        }
    }

    fn is_available(&self) -> bool {
        matches!(self.cell.get(), Some(Ok(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashingEmbedder;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_loads_once_on_first_use() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let lazy = LazyEmbedder::new("test", 8, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(HashingEmbedder::new(8)) as Arc<dyn EmbedderBackend>)
        });

        assert!(!lazy.is_initialized());
        assert!(!lazy.is_available());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        lazy.embed("hello").unwrap();
        lazy.embed_batch(&["a", "b"]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(lazy.is_available());
        assert_eq!(lazy.model_name(), "hashing-8");
    }

    #[test]
    fn test_concurrent_first_use_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let lazy = LazyEmbedder::new("test", 8, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(20));
            Ok(Arc::new(HashingEmbedder::new(8)) as Arc<dyn EmbedderBackend>)
        });

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| lazy.embed("race").unwrap());
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_is_sticky() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let lazy = LazyEmbedder::new("missing-model", 384, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(Error::ModelUnavailable("model.onnx not found".into()))
        });

        for _ in 0..3 {
            match lazy.embed("hello") {
                Err(Error::ModelUnavailable(msg)) => assert_eq!(msg, "model.onnx not found"),
                other => panic!("expected ModelUnavailable, got {:?}", other.map(|_| ())),
            }
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(lazy.is_initialized());
        assert!(!lazy.is_available());
        assert_eq!(lazy.dimension(), 384);
        assert_eq!(lazy.model_name(), "missing-model");
    }

    #[test]
    fn test_other_load_errors_become_model_unavailable() {
        let lazy = LazyEmbedder::new("broken", 4, || Err(Error::Inference("bad graph".into())));
        assert!(matches!(lazy.embed("x"), Err(Error::ModelUnavailable(_))));
    }
}
