//! Configuration from environment and defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default HuggingFace model used for embeddings.
pub const DEFAULT_MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Embedding dimension of all-MiniLM-L6-v2.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Which embedding backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// ONNX sentence-transformer, loaded lazily from `model_dir`.
    Onnx,
    /// Deterministic feature-hashing embedder, no model files needed.
    Hashing,
}

impl FromStr for EmbedderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onnx" => Ok(Self::Onnx),
            "hashing" | "hash" => Ok(Self::Hashing),
            other => Err(Error::Config(format!("unknown embedder: {other}"))),
        }
    }
}

/// Classification strategy for the batch adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Rules,
    Similarity,
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rules" | "rule" => Ok(Self::Rules),
            "similarity" | "ai" => Ok(Self::Similarity),
            other => Err(Error::Config(format!("unknown strategy: {other}"))),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rules => write!(f, "rules"),
            Self::Similarity => write!(f, "similarity"),
        }
    }
}

/// Top-level Mailsort configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailsortConfig {
    /// HTTP server port.
    pub port: u16,
    /// Root data directory.
    pub data_dir: PathBuf,
    /// Directory holding `model.onnx` and `tokenizer.json`.
    pub model_dir: PathBuf,
    pub model_name: String,
    /// Embedding dimension (384 for all-MiniLM-L6-v2).
    pub embedding_dim: usize,
    pub embedder: EmbedderKind,
    pub strategy: StrategyKind,
    /// Custom taxonomy JSON file; the fixed six-category table when unset.
    pub taxonomy_file: Option<PathBuf>,
    /// Load the model and descriptor embeddings at startup.
    pub warm_model: bool,
}

impl MailsortConfig {
    /// Defaults rooted at `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            port: 3004,
            model_dir: data_dir.join("models").join(DEFAULT_MODEL_NAME),
            data_dir,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            embedder: EmbedderKind::Onnx,
            strategy: StrategyKind::Similarity,
            taxonomy_file: None,
            warm_model: true,
        }
    }

    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_lookup(data_dir, |key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup<F>(data_dir: impl AsRef<Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(data_dir);

        if let Some(port) = lookup("PORT") {
            config.port = port
                .parse()
                .map_err(|_| Error::Config(format!("invalid PORT: {port}")))?;
        }
        if let Some(dir) = lookup("MAILSORT_MODEL_DIR") {
            config.model_dir = PathBuf::from(dir);
        }
        if let Some(kind) = lookup("MAILSORT_EMBEDDER") {
            config.embedder = kind.parse()?;
        }
        if let Some(strategy) = lookup("MAILSORT_STRATEGY") {
            config.strategy = strategy.parse()?;
        }
        config.taxonomy_file = lookup("MAILSORT_TAXONOMY")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        if let Some(warm) = lookup("MAILSORT_WARM") {
            config.warm_model = match warm.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => return Err(Error::Config(format!("invalid MAILSORT_WARM: {other}"))),
            };
        }

        Ok(config)
    }
}
