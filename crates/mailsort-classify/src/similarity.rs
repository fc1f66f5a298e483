//! Nearest-category classification by cosine similarity.
//!
//! Message texts and category descriptors are each embedded in one backend
//! call, stacked into row-normalized matrices, and scored into a
//! messages x categories similarity matrix. Each row's arg-max is the
//! prediction; ties go to the category declared first.
//!
//! Every cell is a dot product of two contiguous rows, independent of batch
//! size, and single-text calls run through the batch path with a batch of
//! one, so both paths produce bit-identical labels and scores.

use std::sync::Arc;

use mailsort_core::{compose_text, Error, Message, Result};
use mailsort_infer::{l2_normalize, EmbedderBackend, Embedding};
use ndarray::{Array2, ArrayView1};
use serde::Serialize;

use crate::descriptors::DescriptorCache;
use crate::taxonomy::Taxonomy;

/// Winning category for one text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLabel {
    /// Position of the category in the taxonomy.
    pub category_index: usize,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_id: Option<String>,
    /// Cosine similarity between the text and the category descriptor.
    pub score: f32,
}

/// Embedding-similarity classifier bound to one embedder.
pub struct SimilarityClassifier {
    embedder: Arc<dyn EmbedderBackend>,
    descriptors: DescriptorCache,
}

impl SimilarityClassifier {
    pub fn new(embedder: Arc<dyn EmbedderBackend>) -> Self {
        Self {
            embedder,
            descriptors: DescriptorCache::new(),
        }
    }

    /// Like [`new`](Self::new), keeping at most `capacity` taxonomies embedded.
    pub fn with_descriptor_capacity(embedder: Arc<dyn EmbedderBackend>, capacity: usize) -> Self {
        Self {
            embedder,
            descriptors: DescriptorCache::with_capacity(capacity),
        }
    }

    /// Number of taxonomies whose descriptor embeddings are cached.
    pub fn cached_taxonomies(&self) -> usize {
        self.descriptors.len()
    }

    pub fn embedder(&self) -> &Arc<dyn EmbedderBackend> {
        &self.embedder
    }

    /// Load the model and embed the taxonomy's descriptors ahead of time.
    pub fn warm(&self, taxonomy: &Taxonomy) -> Result<()> {
        self.descriptor_matrix(taxonomy).map(|_| ())
    }

    /// Label of the category closest to `text`.
    pub fn classify(&self, text: &str, taxonomy: &Taxonomy) -> Result<String> {
        Ok(self.classify_scored(text, taxonomy)?.label)
    }

    pub fn classify_scored(&self, text: &str, taxonomy: &Taxonomy) -> Result<ScoredLabel> {
        self.classify_batch_scored(&[text], taxonomy)?
            .pop()
            .ok_or_else(|| Error::Inference("no score row for text".into()))
    }

    /// Classify from the three header-level fields.
    pub fn classify_by_similarity(
        &self,
        sender: Option<&str>,
        subject: Option<&str>,
        snippet: Option<&str>,
        taxonomy: &Taxonomy,
    ) -> Result<String> {
        self.classify(&compose_text(sender, subject, snippet), taxonomy)
    }

    /// Classify a message from its representative text (body included).
    pub fn classify_message(&self, message: &Message, taxonomy: &Taxonomy) -> Result<String> {
        self.classify(&message.representative_text(), taxonomy)
    }

    /// Labels for every text, in input order.
    pub fn classify_batch(&self, texts: &[&str], taxonomy: &Taxonomy) -> Result<Vec<String>> {
        Ok(self
            .classify_batch_scored(texts, taxonomy)?
            .into_iter()
            .map(|s| s.label)
            .collect())
    }

    pub fn classify_batch_scored(
        &self,
        texts: &[&str],
        taxonomy: &Taxonomy,
    ) -> Result<Vec<ScoredLabel>> {
        let scores = self.score_matrix(texts, taxonomy)?;
        scores
            .rows()
            .into_iter()
            .map(|row| {
                let (index, score) = arg_max(row);
                let category = taxonomy
                    .get(index)
                    .ok_or_else(|| Error::Inference(format!("no category at index {index}")))?;
                Ok(ScoredLabel {
                    category_index: index,
                    label: category.label.clone(),
                    label_id: category.label_id.clone(),
                    score,
                })
            })
            .collect()
    }

    /// Cosine similarity of every text against every category (texts x categories).
    ///
    /// Fails with `EmptyCategorySet` before touching the embedder when the
    /// taxonomy has no categories.
    pub fn score_matrix(&self, texts: &[&str], taxonomy: &Taxonomy) -> Result<Array2<f32>> {
        let categories = self.descriptor_matrix(taxonomy)?;
        if texts.is_empty() {
            return Ok(Array2::zeros((0, categories.nrows())));
        }

        let messages = stack_rows(self.embedder.embed_batch(texts)?)?;
        if messages.ncols() != categories.ncols() {
            return Err(Error::Inference(format!(
                "message embeddings have {} dimensions, descriptors have {}",
                messages.ncols(),
                categories.ncols()
            )));
        }
        Ok(Array2::from_shape_fn(
            (messages.nrows(), categories.nrows()),
            |(i, j)| messages.row(i).dot(&categories.row(j)),
        ))
    }

    fn descriptor_matrix(&self, taxonomy: &Taxonomy) -> Result<Arc<Array2<f32>>> {
        if taxonomy.is_empty() {
            return Err(Error::EmptyCategorySet);
        }
        let descriptors = taxonomy.descriptors();
        self.descriptors.get_or_compute(&descriptors, || {
            stack_rows(self.embedder.embed_batch(&descriptors)?)
        })
    }
}

/// Stack embeddings into a row-normalized matrix.
fn stack_rows(embeddings: Vec<Embedding>) -> Result<Array2<f32>> {
    let rows = embeddings.len();
    let dim = embeddings.first().map_or(0, |e| e.len());
    let mut matrix = Array2::<f32>::zeros((rows, dim));
    for (i, mut embedding) in embeddings.into_iter().enumerate() {
        if embedding.len() != dim {
            return Err(Error::Inference(format!(
                "embedding {i} has {} dimensions, expected {dim}",
                embedding.len()
            )));
        }
        l2_normalize(&mut embedding);
        matrix.row_mut(i).assign(&embedding);
    }
    Ok(matrix)
}

/// Index and value of the maximum score. The first index wins ties and NaN
/// never wins over a number.
fn arg_max(row: ArrayView1<'_, f32>) -> (usize, f32) {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in row.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((i, score));
        }
    }
    best.unwrap_or((0, row.get(0).copied().unwrap_or(f32::NAN)))
}
