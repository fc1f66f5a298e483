//! Mailsort Infer — embedding backends, lazy model loading, embedding cache.
//!
//! Provides the `EmbedderBackend` trait for generating embeddings.
//! When the `onnx` feature is enabled and model files are present,
//! `OnnxEmbedder` loads all-MiniLM-L6-v2 for 384-dim embeddings on first use.
//! `HashingEmbedder` needs no model and is selected explicitly.

pub mod cache;
pub mod embedder;
pub mod hashing;
pub mod lazy;
pub mod onnx_embedder;

pub use cache::EmbeddingCache;
pub use embedder::{l2_normalize, EmbedderBackend, Embedding};
pub use hashing::HashingEmbedder;
pub use lazy::LazyEmbedder;

#[cfg(feature = "onnx")]
pub use onnx_embedder::OnnxEmbedder;

use std::path::Path;
use std::sync::Arc;

use mailsort_core::{EmbedderKind, MailsortConfig};

/// Create the embedder selected by the configuration.
///
/// The ONNX backend is returned unloaded; the model is read on first use.
/// A missing model surfaces as `ModelUnavailable` at that point and is never
/// replaced by the hashing backend.
pub fn create_embedder(config: &MailsortConfig) -> Arc<dyn EmbedderBackend> {
    match config.embedder {
        EmbedderKind::Hashing => {
            tracing::info!("Using hashing embedder (dim={})", config.embedding_dim);
            Arc::new(HashingEmbedder::new(config.embedding_dim))
        }
        EmbedderKind::Onnx => {
            tracing::info!(
                "Using ONNX embedder {} from {}",
                config.model_name,
                config.model_dir.display()
            );
            Arc::new(lazy_onnx(&config.model_name, config.embedding_dim, &config.model_dir))
        }
    }
}

#[cfg(feature = "onnx")]
fn lazy_onnx(model_name: &str, dim: usize, model_dir: &Path) -> LazyEmbedder {
    let model_dir = model_dir.to_path_buf();
    LazyEmbedder::new(model_name, dim, move || {
        let embedder = OnnxEmbedder::load(&model_dir)?;
        Ok(Arc::new(embedder) as Arc<dyn EmbedderBackend>)
    })
}

#[cfg(not(feature = "onnx"))]
fn lazy_onnx(model_name: &str, dim: usize, model_dir: &Path) -> LazyEmbedder {
    let _ = model_dir;
    LazyEmbedder::new(model_name, dim, || {
        Err(mailsort_core::Error::ModelUnavailable(
            "built without the `onnx` feature".into(),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailsort_core::Error;

    #[test]
    fn test_hashing_embedder_from_config() {
        let mut config = MailsortConfig::new("data");
        config.embedder = EmbedderKind::Hashing;
        config.embedding_dim = 32;
        let embedder = create_embedder(&config);
        assert!(embedder.is_available());
        assert_eq!(embedder.dimension(), 32);
        assert_eq!(embedder.embed("hi").unwrap().len(), 32);
    }

    #[test]
    fn test_onnx_missing_model_is_unavailable() {
        let dir = std::env::temp_dir().join("mailsort-no-such-model");
        let mut config = MailsortConfig::new("data");
        config.model_dir = dir;
        let embedder = create_embedder(&config);
        assert!(!embedder.is_available());
        assert_eq!(embedder.dimension(), 384);
        assert!(matches!(embedder.embed("hi"), Err(Error::ModelUnavailable(_))));
    }
}
