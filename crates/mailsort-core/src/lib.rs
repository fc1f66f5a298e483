//! Mailsort Core — message model, category labels, errors, configuration.

pub mod config;
pub mod error;
pub mod message;

pub use config::{EmbedderKind, MailsortConfig, StrategyKind};
pub use error::{Error, Result};
pub use message::{
    compose_text, headers_from_pairs, ClassificationResult, FixedLabel, MailboxLabel, Message,
};
