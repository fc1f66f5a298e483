//! Embedding backend trait and shared vector helpers.
//!
//! The `EmbedderBackend` trait abstracts over embedding generation.
//! Implementations:
//! - `OnnxEmbedder`: ONNX Runtime with all-MiniLM-L6-v2 (requires the `onnx` feature)
//! - `HashingEmbedder`: deterministic feature hashing, no model files
//! - `LazyEmbedder`: defers construction of another backend to first use

use mailsort_core::Result;
use ndarray::Array1;

/// An L2-normalized embedding vector.
pub type Embedding = Array1<f32>;

/// Trait for embedding backends.
///
/// Implementations must be deterministic: the same text always yields the
/// same vector for a given model.
pub trait EmbedderBackend: Send + Sync {
    /// Generate an embedding for a text string.
    fn embed(&self, text: &str) -> Result<Embedding>;

    /// Generate embeddings for a batch of texts, in input order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Name of the underlying model.
    fn model_name(&self) -> &str;

    /// Check if the embedder is ready (model loaded).
    fn is_available(&self) -> bool;
}

/// L2-normalize a vector in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut Embedding) {
    let norm = v.dot(v).sqrt();
    if norm > 0.0 {
        v.mapv_inplace(|x| x / norm);
    }
}
