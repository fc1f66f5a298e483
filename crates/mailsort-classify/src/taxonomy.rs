//! Ordered category sets used as classification targets.

use std::path::Path;

use mailsort_core::{FixedLabel, MailboxLabel, Result};
use serde::{Deserialize, Serialize};

use crate::labels::{display_name, is_classifiable};

/// Descriptor sentences for the built-in taxonomy, in declaration order.
pub const FIXED_DESCRIPTORS: [(FixedLabel, &str); 6] = [
    (
        FixedLabel::Primary,
        "Personal and important emails from people you know.",
    ),
    (
        FixedLabel::Promotions,
        "Deals, offers, advertisements and other promotional emails.",
    ),
    (
        FixedLabel::Social,
        "Messages from social networks and media-sharing sites.",
    ),
    (
        FixedLabel::Updates,
        "Automated confirmations, notifications, statements and reminders.",
    ),
    (
        FixedLabel::Forums,
        "Messages from online groups, discussion boards and mailing lists.",
    ),
    (
        FixedLabel::Work,
        "Work-related emails from corporate or professional domains.",
    ),
];

/// A classification target: the label returned on a match and the text
/// embedded to represent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub descriptor: String,
    /// Mailbox label id, set for categories derived from mailbox labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_id: Option<String>,
}

impl Category {
    pub fn new(label: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            descriptor: descriptor.into(),
            label_id: None,
        }
    }
}

/// An ordered, immutable set of categories. Order decides ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The six built-in categories with their descriptor sentences.
    pub fn fixed() -> Self {
        Self::new(
            FIXED_DESCRIPTORS
                .iter()
                .map(|(label, descriptor)| Category::new(label.as_str(), *descriptor))
                .collect(),
        )
    }

    /// Build a taxonomy from mailbox labels.
    ///
    /// User labels and `CATEGORY_*` system labels become categories whose
    /// descriptor is their display name; other system labels are skipped.
    /// Labels sharing a display name collapse into the first position and
    /// keep the later label id.
    pub fn from_mailbox_labels(labels: &[MailboxLabel]) -> Self {
        let mut categories: Vec<Category> = Vec::new();
        for label in labels.iter().filter(|l| is_classifiable(l)) {
            let name = display_name(&label.name);
            match categories.iter_mut().find(|c| c.label == name) {
                Some(existing) => existing.label_id = Some(label.id.clone()),
                None => categories.push(Category {
                    descriptor: name.clone(),
                    label: name,
                    label_id: Some(label.id.clone()),
                }),
            }
        }
        Self::new(categories)
    }

    /// Load a custom taxonomy: a JSON array of `{label, descriptor}` records.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn descriptors(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.descriptor.as_str()).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::fixed()
    }
}
