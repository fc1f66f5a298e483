//! Message records, the fixed label set and classification results.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Separator used when composing a message's representative text.
pub const TEXT_SEPARATOR: &str = ". ";

/// An email as supplied by the mailbox integration. Every field is optional;
/// absent fields behave as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, alias = "from", skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
}

impl Message {
    pub fn new(sender: &str, subject: &str, snippet: &str) -> Self {
        Self {
            sender: Some(sender.to_string()),
            subject: Some(subject.to_string()),
            snippet: Some(snippet.to_string()),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn sender(&self) -> &str {
        self.sender.as_deref().unwrap_or("")
    }

    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or("")
    }

    pub fn snippet(&self) -> &str {
        self.snippet.as_deref().unwrap_or("")
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    /// Text used as the embedding input: the non-empty fields among sender,
    /// subject, snippet and body, in that order.
    pub fn representative_text(&self) -> String {
        join_non_empty(&[self.sender(), self.subject(), self.snippet(), self.body()])
    }
}

/// Compose the embedding input from the three header-level fields.
pub fn compose_text(sender: Option<&str>, subject: Option<&str>, snippet: Option<&str>) -> String {
    join_non_empty(&[
        sender.unwrap_or(""),
        subject.unwrap_or(""),
        snippet.unwrap_or(""),
    ])
}

fn join_non_empty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(TEXT_SEPARATOR)
}

/// Build a header map from a mailbox API's `(name, value)` list.
/// Later duplicates overwrite earlier ones.
pub fn headers_from_pairs<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// The built-in six-category taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixedLabel {
    Primary,
    Promotions,
    Social,
    Updates,
    Forums,
    Work,
}

impl FixedLabel {
    /// All labels in taxonomy order.
    pub const ALL: [FixedLabel; 6] = [
        FixedLabel::Primary,
        FixedLabel::Promotions,
        FixedLabel::Social,
        FixedLabel::Updates,
        FixedLabel::Forums,
        FixedLabel::Work,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Promotions => "Promotions",
            Self::Social => "Social",
            Self::Updates => "Updates",
            Self::Forums => "Forums",
            Self::Work => "Work",
        }
    }
}

impl std::fmt::Display for FixedLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixedLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| Error::Config(format!("unknown label: {s}")))
    }
}

/// A label record as listed by the mailbox API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxLabel {
    pub id: String,
    pub name: String,
    /// `system` or `user`.
    #[serde(rename = "type", default)]
    pub label_type: String,
}

impl MailboxLabel {
    pub fn new(id: &str, name: &str, label_type: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            label_type: label_type.to_string(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.label_type == "user"
    }

    pub fn is_system(&self) -> bool {
        self.label_type == "system"
    }
}

/// Predicted label for the message at `index` of the input batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub index: usize,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}
