//! ONNX-based embedding engine using all-MiniLM-L6-v2.
//!
//! Loads a SentenceTransformers ONNX model and tokenizer to generate
//! 384-dimensional, L2-normalized float32 embeddings. Requires the `onnx` feature.

#[cfg(feature = "onnx")]
mod inner {
    use std::fmt::Display;
    use std::path::Path;

    use mailsort_core::{Error, Result};
    use ndarray::Array1;
    use ort::session::Session;
    use ort::value::Tensor;
    use parking_lot::Mutex;
    use tokenizers::{Tokenizer, TruncationParams};
    use tracing::info;

    use crate::cache::EmbeddingCache;
    use crate::embedder::{l2_normalize, EmbedderBackend, Embedding};

    /// Maximum sequence length for the model.
    const MAX_SEQ_LEN: usize = 256;

    /// Default embedding dimension (all-MiniLM-L6-v2).
    const DEFAULT_DIM: usize = 384;

    fn inference_err<E: Display>(context: &'static str) -> impl Fn(E) -> Error {
        move |e| Error::Inference(format!("{context}: {e}"))
    }

    /// Truncate to the model's window, keeping the special tokens.
    pub(crate) fn truncation_params() -> TruncationParams {
        TruncationParams {
            max_length: MAX_SEQ_LEN,
            ..Default::default()
        }
    }

    fn unavailable<E: Display>(e: E) -> Error {
        Error::ModelUnavailable(e.to_string())
    }

    /// ONNX embedding engine using all-MiniLM-L6-v2.
    pub struct OnnxEmbedder {
        session: Mutex<Session>,
        tokenizer: Tokenizer,
        cache: EmbeddingCache,
        dimension: usize,
        model_name: String,
    }

    impl OnnxEmbedder {
        /// Load an ONNX model and tokenizer from the given directory.
        ///
        /// Expects:
        /// - `model_dir/model.onnx` — the ONNX model file
        /// - `model_dir/tokenizer.json` — the HuggingFace tokenizer
        ///
        /// Missing files and runtime initialization failures are reported
        /// as `ModelUnavailable`.
        pub fn load(model_dir: &Path) -> Result<Self> {
            let model_path = model_dir.join("model.onnx");
            let tokenizer_path = model_dir.join("tokenizer.json");

            if !model_path.exists() {
                return Err(Error::ModelUnavailable(format!(
                    "Model not found: {}",
                    model_path.display()
                )));
            }
            if !tokenizer_path.exists() {
                return Err(Error::ModelUnavailable(format!(
                    "Tokenizer not found: {}",
                    tokenizer_path.display()
                )));
            }

            // With load-dynamic, ORT_DYLIB_PATH must point to libonnxruntime.so
            ort::init().commit();

            let session = Session::builder()
                .map_err(unavailable)?
                .with_intra_threads(2)
                .map_err(unavailable)?
                .commit_from_file(&model_path)
                .map_err(unavailable)?;

            let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| Error::ModelUnavailable(format!("Failed to load tokenizer: {e}")))?;
            tokenizer
                .with_truncation(Some(truncation_params()))
                .map_err(|e| Error::ModelUnavailable(format!("Failed to set truncation: {e}")))?;

            let model_name = model_dir
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("onnx")
                .to_string();

            info!(
                "ONNX embedder loaded: dim={}, model={}",
                DEFAULT_DIM,
                model_path.display()
            );

            Ok(Self {
                session: Mutex::new(session),
                tokenizer,
                cache: EmbeddingCache::default_cache(),
                dimension: DEFAULT_DIM,
                model_name,
            })
        }

        /// Run inference on a single text and mean-pool the token embeddings.
        fn infer(&self, text: &str) -> Result<Embedding> {
            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(|e| Error::Inference(format!("Tokenization failed: {e}")))?;

            // Truncated by the tokenizer, so [SEP] is kept on long inputs.
            let input_ids = encoding.get_ids();
            let attention_mask = encoding.get_attention_mask();
            let seq_len = input_ids.len();

            let ids_data: Vec<i64> = input_ids.iter().map(|&id| id as i64).collect();
            let mask_data: Vec<i64> = attention_mask.iter().map(|&m| m as i64).collect();
            let type_ids_data: Vec<i64> = vec![0i64; seq_len];

            let ids_tensor = Tensor::from_array(([1usize, seq_len], ids_data))
                .map_err(inference_err("ids tensor"))?;
            let mask_tensor = Tensor::from_array(([1usize, seq_len], mask_data))
                .map_err(inference_err("mask tensor"))?;
            let type_ids_tensor = Tensor::from_array(([1usize, seq_len], type_ids_data))
                .map_err(inference_err("type_ids tensor"))?;

            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![ids_tensor, mask_tensor, type_ids_tensor])
                .map_err(inference_err("ONNX inference failed"))?;

            // Either [1, seq_len, dim] token embeddings or an already pooled [1, dim].
            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(inference_err("output tensor"))?;
            let dims: Vec<i64> = shape.iter().copied().collect();

            let mut embedding = match dims.as_slice() {
                [_, tokens, dim] => {
                    let dim = *dim as usize;
                    let tokens = (*tokens as usize).min(seq_len);
                    let mut pooled = Array1::<f32>::zeros(dim);
                    let mut mask_sum = 0.0f32;
                    for (i, &m) in attention_mask.iter().take(tokens).enumerate() {
                        if m > 0 {
                            let offset = i * dim;
                            for d in 0..dim {
                                pooled[d] += data[offset + d];
                            }
                            mask_sum += 1.0;
                        }
                    }
                    if mask_sum > 0.0 {
                        pooled /= mask_sum;
                    }
                    pooled
                }
                [_, dim] => Array1::from_vec(data[..*dim as usize].to_vec()),
                other => {
                    return Err(Error::Inference(format!("Unexpected output shape: {other:?}")))
                }
            };

            if embedding.len() != self.dimension {
                return Err(Error::Inference(format!(
                    "Embedding dimension {} does not match expected {}",
                    embedding.len(),
                    self.dimension
                )));
            }

            l2_normalize(&mut embedding);
            Ok(embedding)
        }
    }

    impl EmbedderBackend for OnnxEmbedder {
        fn embed(&self, text: &str) -> Result<Embedding> {
            if let Some(cached) = self.cache.get(text) {
                return Ok(cached);
            }

            let embedding = self.infer(text)?;
            self.cache.put(text.to_string(), embedding.clone());
            Ok(embedding)
        }

        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
            // Text by text: padded batches would perturb the pooled values.
            texts.iter().map(|t| self.embed(t)).collect()
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn model_name(&self) -> &str {
            &self.model_name
        }

        fn is_available(&self) -> bool {
            true
        }
    }
}

#[cfg(feature = "onnx")]
pub use inner::OnnxEmbedder;
