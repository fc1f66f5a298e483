//! End-to-end classification scenarios across the rule engine, the
//! similarity classifier and mailbox-derived taxonomies.

use std::collections::HashMap;
use std::sync::Arc;

use mailsort_classify::{classify_messages, SimilarityClassifier, Strategy, Taxonomy};
use mailsort_core::{FixedLabel, MailboxLabel, Message};
use mailsort_infer::HashingEmbedder;
use mailsort_rules::classify_by_rule;

fn list_headers() -> HashMap<String, String> {
    HashMap::from([("List-Id".to_string(), "<dev@lists.example.com>".to_string())])
}

#[test]
fn test_rule_scenarios() {
    assert_eq!(
        classify_by_rule(
            Some("deals@mailchimp.com"),
            Some("50% off sale ends today"),
            None,
            None
        ),
        FixedLabel::Promotions
    );
    assert_eq!(
        classify_by_rule(Some("bob@acmecorp.com"), None, None, None),
        FixedLabel::Work
    );
    assert_eq!(
        classify_by_rule(None, None, None, Some(&list_headers())),
        FixedLabel::Forums
    );
    assert_eq!(
        classify_by_rule(Some("friend@gmail.com"), Some("Let's catch up"), None, None),
        FixedLabel::Primary
    );
}

#[test]
fn test_rule_output_always_in_fixed_set() {
    let senders = [None, Some(""), Some("@"), Some("a@b@c.com"), Some("x@reddit.com")];
    let subjects = [None, Some(""), Some("Invoice #12"), Some("Weekly digest"), Some("hi")];
    for sender in senders {
        for subject in subjects {
            let label = classify_by_rule(sender, subject, subject, None);
            assert!(FixedLabel::ALL.contains(&label));
        }
    }
}

#[test]
fn test_similarity_against_mailbox_labels() {
    let labels = vec![
        MailboxLabel::new("INBOX", "INBOX", "system"),
        MailboxLabel::new("CATEGORY_PROMOTIONS", "CATEGORY_PROMOTIONS", "system"),
        MailboxLabel::new("Label_3", "Travel", "user"),
        MailboxLabel::new("Label_4", "Receipts", "user"),
    ];
    let taxonomy = Taxonomy::from_mailbox_labels(&labels);
    assert_eq!(taxonomy.labels(), vec!["Promotions", "Travel", "Receipts"]);

    let classifier = SimilarityClassifier::new(Arc::new(HashingEmbedder::new(512)));
    let messages = vec![
        Message::new("trips@air.example", "Travel plans", "Your travel itinerary"),
        Message::new("shop@store.example", "Receipts", "Receipts for your purchase"),
    ];
    let strategy = Strategy::Similarity {
        classifier: &classifier,
        taxonomy: &taxonomy,
    };
    let predicted = classify_messages(&messages, strategy).unwrap();
    assert_eq!(predicted, vec!["Travel", "Receipts"]);
}

#[test]
fn test_custom_taxonomy_keeps_declared_order_for_ties() {
    let taxonomy = Taxonomy::new(vec![
        mailsort_classify::Category::new("Newsletters", "weekly newsletter"),
        mailsort_classify::Category::new("Digests", "weekly newsletter"),
    ]);
    let classifier = SimilarityClassifier::new(Arc::new(HashingEmbedder::new(128)));
    let label = classifier
        .classify_by_similarity(Some("news@site.example"), Some("Weekly newsletter"), None, &taxonomy)
        .unwrap();
    assert_eq!(label, "Newsletters");
}
