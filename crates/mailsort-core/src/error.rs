//! Error types for Mailsort.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The embedding model could not be initialized. Sticky for the process.
    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Cannot classify against an empty category set")]
    EmptyCategorySet,

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
