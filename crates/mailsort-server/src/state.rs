//! Shared application state.

use std::sync::Arc;

use mailsort_classify::{SimilarityClassifier, Taxonomy};
use mailsort_core::MailsortConfig;
use mailsort_infer::EmbedderBackend;
use tracing::info;

/// State shared by all route handlers. Read-only after construction.
pub struct AppState {
    pub config: MailsortConfig,
    /// Taxonomy used when a request does not bring its own.
    pub taxonomy: Taxonomy,
    pub classifier: SimilarityClassifier,
}

impl AppState {
    /// Build state from configuration: configured taxonomy file (or the
    /// fixed table) and the configured embedder, not yet loaded.
    pub fn new(config: MailsortConfig) -> mailsort_core::Result<Self> {
        let taxonomy = load_taxonomy(&config)?;
        let embedder = mailsort_infer::create_embedder(&config);
        Ok(Self::with_parts(config, taxonomy, embedder))
    }

    pub fn with_parts(
        config: MailsortConfig,
        taxonomy: Taxonomy,
        embedder: Arc<dyn EmbedderBackend>,
    ) -> Self {
        Self {
            config,
            taxonomy,
            classifier: SimilarityClassifier::new(embedder),
        }
    }
}

/// The configured custom taxonomy, or the fixed six-category table.
pub fn load_taxonomy(config: &MailsortConfig) -> mailsort_core::Result<Taxonomy> {
    match &config.taxonomy_file {
        Some(path) => {
            let taxonomy = Taxonomy::load(path)?;
            info!(
                "Loaded taxonomy with {} categories from {}",
                taxonomy.len(),
                path.display()
            );
            Ok(taxonomy)
        }
        None => Ok(Taxonomy::fixed()),
    }
}
