//! Feature-hashing embedder.
//!
//! Maps lower-cased alphanumeric tokens into signed buckets with FNV-1a and
//! L2-normalizes the result. No model files, no I/O, fully deterministic
//! across processes and platforms. Texts sharing words score higher, which
//! is enough for offline runs and for tests that need a fast stand-in.

use mailsort_core::Result;
use ndarray::Array1;

use crate::embedder::{l2_normalize, EmbedderBackend, Embedding};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub struct HashingEmbedder {
    dimension: usize,
    name: String,
}

impl HashingEmbedder {
    /// `dimension` must be non-zero; zero is bumped to one.
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            name: format!("hashing-{dimension}"),
        }
    }
}

impl EmbedderBackend for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding> {
        let mut v = Array1::<f32>::zeros(self.dimension);
        for token in tokens(text) {
            let h = fnv1a(token.as_bytes());
            let bucket = (h % self.dimension as u64) as usize;
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }
        l2_normalize(&mut v);
        Ok(v)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        true
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(FNV_PRIME)
    })
}
