//! Ordered rule evaluation.

use std::collections::HashMap;

use mailsort_core::{FixedLabel, Message};

use crate::tables::*;

/// Domain part of an email address, lower-cased and trimmed.
///
/// Returns an empty string unless the address contains exactly one `@`.
pub fn extract_domain(email_address: &str) -> String {
    let mut parts = email_address.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(domain), None) => domain.trim().to_lowercase(),
        _ => String::new(),
    }
}

/// Whether any keyword occurs in `text`, ignoring case.
pub fn has_any_keyword(text: &str, keywords: &[&str]) -> bool {
    let text_lower = text.to_lowercase();
    keywords.iter().any(|k| text_lower.contains(k))
}

/// Classify a message by its sender, subject, snippet and headers.
///
/// Priority is fixed: Social, Promotions, Updates, Forums, Work, then Primary.
pub fn classify_by_rule(
    sender: Option<&str>,
    subject: Option<&str>,
    snippet: Option<&str>,
    headers: Option<&HashMap<String, String>>,
) -> FixedLabel {
    let subject = subject.unwrap_or("");
    let snippet = snippet.unwrap_or("");
    let domain = extract_domain(sender.unwrap_or(""));
    let mentions = |keywords: &[&str]| {
        has_any_keyword(subject, keywords) || has_any_keyword(snippet, keywords)
    };

    if SOCIAL_DOMAINS.contains(&domain.as_str()) || mentions(SOCIAL_KEYWORDS) {
        return FixedLabel::Social;
    }

    if mentions(PROMOTION_KEYWORDS)
        || MARKETING_DOMAIN_SUFFIXES
            .iter()
            .any(|suffix| domain.ends_with(suffix))
    {
        return FixedLabel::Promotions;
    }

    if mentions(UPDATES_KEYWORDS) {
        return FixedLabel::Updates;
    }

    if headers.is_some_and(has_list_id) || mentions(FORUM_KEYWORDS) {
        return FixedLabel::Forums;
    }

    if !domain.is_empty() && !FREE_EMAIL_PROVIDERS.contains(&domain.as_str()) {
        return FixedLabel::Work;
    }

    FixedLabel::Primary
}

/// [`classify_by_rule`] over a [`Message`]. The body is not consulted.
pub fn classify_message_by_rule(message: &Message) -> FixedLabel {
    classify_by_rule(
        message.sender.as_deref(),
        message.subject.as_deref(),
        message.snippet.as_deref(),
        message.headers.as_ref(),
    )
}

fn has_list_id(headers: &HashMap<String, String>) -> bool {
    LIST_ID_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .any(|value| !value.is_empty())
}
