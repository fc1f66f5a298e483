//! Category taxonomies and the embedding-similarity classifier.
//!
//! A [`Taxonomy`] is an ordered list of `{label, descriptor}` categories,
//! either the built-in six-category table, a custom table, or one derived
//! from mailbox labels. [`SimilarityClassifier`] embeds message text and
//! descriptors with an injected [`EmbedderBackend`](mailsort_infer::EmbedderBackend)
//! and picks the most similar category. [`classify_messages`] runs either
//! strategy over a batch.

pub mod batch;
pub mod descriptors;
pub mod labels;
pub mod similarity;
pub mod taxonomy;

pub use batch::{classify_messages, classify_messages_detailed, Strategy};
pub use descriptors::DescriptorCache;
pub use labels::{display_name, is_classifiable};
pub use similarity::{ScoredLabel, SimilarityClassifier};
pub use taxonomy::{Category, Taxonomy};
