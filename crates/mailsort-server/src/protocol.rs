//! Request and response shapes shared by the HTTP and stdin adapters.

use mailsort_classify::{Category, Taxonomy};
use mailsort_core::{ClassificationResult, Error, MailboxLabel, Message};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/classify/*`.
#[derive(Debug, Default, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Explicit categories; take precedence over `labels`.
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
    /// Mailbox labels to build a dynamic taxonomy from.
    #[serde(default)]
    pub labels: Option<Vec<MailboxLabel>>,
}

impl ClassifyRequest {
    /// The taxonomy this request classifies against, or `None` to use the
    /// configured one.
    pub fn taxonomy(&self) -> Option<Taxonomy> {
        if let Some(categories) = &self.categories {
            return Some(Taxonomy::new(categories.clone()));
        }
        self.labels
            .as_ref()
            .map(|labels| Taxonomy::from_mailbox_labels(labels))
    }
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub strategy: String,
    pub labels: Vec<String>,
    pub results: Vec<ClassificationResult>,
    pub total: usize,
}

impl ClassifyResponse {
    pub fn new(strategy: impl Into<String>, results: Vec<ClassificationResult>) -> Self {
        Self {
            strategy: strategy.into(),
            labels: results.iter().map(|r| r.label.clone()).collect(),
            total: results.len(),
            results,
        }
    }
}

/// Parse adapter input: a JSON array of messages, or one JSON message per
/// line. Blank input yields no messages.
pub fn parse_messages(input: &str) -> mailsort_core::Result<Vec<Message>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str::<Message>(line).map_err(Error::from))
        .collect()
}

const SUBJECT_WIDTH: usize = 60;

/// Render a `#`, category and subject grid for terminal output.
pub fn render_table(messages: &[Message], labels: &[String]) -> String {
    let label_width = labels
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once("Category".len()))
        .max()
        .unwrap_or(0);
    let index_width = messages.len().max(1).to_string().len().max(1);

    let mut out = format!(
        "{:>iw$}  {:<lw$}  Subject\n",
        "#",
        "Category",
        iw = index_width,
        lw = label_width
    );
    for (i, (message, label)) in messages.iter().zip(labels).enumerate() {
        out.push_str(&format!(
            "{:>iw$}  {:<lw$}  {}\n",
            i + 1,
            label,
            truncate(message.subject(), SUBJECT_WIDTH),
            iw = index_width,
            lw = label_width
        ));
    }
    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array_and_lines() {
        let array = r#"[{"from": "a@x.com", "subject": "Hi"}, {"subject": "Yo"}]"#;
        let messages = parse_messages(array).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender(), "a@x.com");

        let lines = "{\"sender\": \"a@x.com\"}\n\n{\"subject\": \"Yo\"}\n";
        let messages = parse_messages(lines).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].subject(), "Yo");
    }

    #[test]
    fn test_parse_blank_input() {
        assert!(parse_messages("").unwrap().is_empty());
        assert!(parse_messages("  \n ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_messages("{not json").is_err());
    }

    #[test]
    fn test_request_taxonomy_precedence() {
        let request: ClassifyRequest = serde_json::from_str(
            r#"{
                "messages": [],
                "categories": [{"label": "Bills", "descriptor": "invoices"}],
                "labels": [{"id": "Label_1", "name": "Travel", "type": "user"}]
            }"#,
        )
        .unwrap();
        assert_eq!(request.taxonomy().unwrap().labels(), vec!["Bills"]);

        let request: ClassifyRequest = serde_json::from_str(
            r#"{"labels": [{"id": "Label_1", "name": "Travel", "type": "user"}]}"#,
        )
        .unwrap();
        let taxonomy = request.taxonomy().unwrap();
        assert_eq!(taxonomy.labels(), vec!["Travel"]);
        assert_eq!(taxonomy.categories()[0].label_id.as_deref(), Some("Label_1"));

        assert!(ClassifyRequest::default().taxonomy().is_none());
    }

    #[test]
    fn test_response_mirrors_results() {
        let results = vec![ClassificationResult {
            index: 0,
            label: "Work".into(),
            label_id: None,
            score: None,
        }];
        let response = ClassifyResponse::new("rules", results);
        assert_eq!(response.labels, vec!["Work"]);
        assert_eq!(response.total, 1);
    }

    #[test]
    fn test_table_truncates_subject() {
        let long = "x".repeat(80);
        let messages = vec![Message::new("a@x.com", &long, "")];
        let table = render_table(&messages, &["Primary".to_string()]);
        let row = table.lines().nth(1).unwrap();
        assert!(row.ends_with("..."));
        assert!(row.contains("Primary"));
        assert!(row.ends_with(&format!("  {}...", "x".repeat(57))));
    }
}
