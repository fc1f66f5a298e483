//! Batch classification over either strategy.

use mailsort_core::{ClassificationResult, Message, Result};
use mailsort_rules::classify_message_by_rule;

use crate::similarity::SimilarityClassifier;
use crate::taxonomy::Taxonomy;

/// How to classify a batch.
#[derive(Clone, Copy)]
pub enum Strategy<'a> {
    /// Lexical rules, one message at a time.
    Rule,
    /// Embedding similarity against `taxonomy`, embedded as one batch.
    Similarity {
        classifier: &'a SimilarityClassifier,
        taxonomy: &'a Taxonomy,
    },
}

/// Label per message; `result[i]` belongs to `messages[i]`.
pub fn classify_messages(messages: &[Message], strategy: Strategy<'_>) -> Result<Vec<String>> {
    Ok(classify_messages_detailed(messages, strategy)?
        .into_iter()
        .map(|r| r.label)
        .collect())
}

/// Like [`classify_messages`], with mailbox label ids and similarity scores
/// where the strategy provides them.
pub fn classify_messages_detailed(
    messages: &[Message],
    strategy: Strategy<'_>,
) -> Result<Vec<ClassificationResult>> {
    match strategy {
        Strategy::Rule => Ok(messages
            .iter()
            .enumerate()
            .map(|(index, message)| ClassificationResult {
                index,
                label: classify_message_by_rule(message).to_string(),
                label_id: None,
                score: None,
            })
            .collect()),
        Strategy::Similarity {
            classifier,
            taxonomy,
        } => {
            let texts: Vec<String> = messages.iter().map(Message::representative_text).collect();
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let scored = classifier.classify_batch_scored(&refs, taxonomy)?;
            Ok(scored
                .into_iter()
                .enumerate()
                .map(|(index, s)| ClassificationResult {
                    index,
                    label: s.label,
                    label_id: s.label_id,
                    score: Some(s.score),
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailsort_core::Error;
    use mailsort_infer::HashingEmbedder;
    use std::sync::Arc;

    fn inbox() -> Vec<Message> {
        vec![
            Message::new("deals@mailchimp.com", "50% off sale ends today", ""),
            Message::new("bob@acmecorp.com", "", ""),
            Message::new("friend@gmail.com", "Let's catch up", ""),
            Message::default().with_header("List-Id", "<dev@lists.example.com>"),
        ]
    }

    #[test]
    fn test_rule_strategy_preserves_order() {
        let labels = classify_messages(&inbox(), Strategy::Rule).unwrap();
        assert_eq!(labels, vec!["Promotions", "Work", "Primary", "Forums"]);
    }

    #[test]
    fn test_rule_results_have_no_scores() {
        let results = classify_messages_detailed(&inbox(), Strategy::Rule).unwrap();
        assert_eq!(results.len(), 4);
        assert!(results.iter().enumerate().all(|(i, r)| r.index == i));
        assert!(results.iter().all(|r| r.score.is_none() && r.label_id.is_none()));
    }

    #[test]
    fn test_similarity_strategy_matches_single_calls() {
        let classifier = SimilarityClassifier::new(Arc::new(HashingEmbedder::new(384)));
        let taxonomy = Taxonomy::fixed();
        let messages = inbox();
        let strategy = Strategy::Similarity {
            classifier: &classifier,
            taxonomy: &taxonomy,
        };

        let results = classify_messages_detailed(&messages, strategy).unwrap();
        assert_eq!(results.len(), messages.len());
        for (message, result) in messages.iter().zip(&results) {
            assert_eq!(
                classifier.classify_message(message, &taxonomy).unwrap(),
                result.label
            );
            assert!(result.score.is_some());
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(classify_messages(&[], Strategy::Rule).unwrap().is_empty());

        let classifier = SimilarityClassifier::new(Arc::new(HashingEmbedder::new(8)));
        let taxonomy = Taxonomy::fixed();
        let strategy = Strategy::Similarity {
            classifier: &classifier,
            taxonomy: &taxonomy,
        };
        assert!(classify_messages(&[], strategy).unwrap().is_empty());
    }

    #[test]
    fn test_similarity_with_empty_taxonomy_fails() {
        let classifier = SimilarityClassifier::new(Arc::new(HashingEmbedder::new(8)));
        let empty = Taxonomy::new(Vec::new());
        let strategy = Strategy::Similarity {
            classifier: &classifier,
            taxonomy: &empty,
        };
        assert!(matches!(
            classify_messages(&inbox(), strategy),
            Err(Error::EmptyCategorySet)
        ));
    }
}
