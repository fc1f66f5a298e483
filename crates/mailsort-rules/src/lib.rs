//! Rule-based categorization — ordered domain, keyword and header rules.
//!
//! Rules are evaluated Social → Promotions → Updates → Forums → Work, and the
//! first match wins. Anything unmatched is Primary. The engine is pure: no I/O,
//! no errors, every input resolves to one of the six fixed labels.

pub mod engine;
pub mod tables;

pub use engine::{classify_by_rule, classify_message_by_rule, extract_domain, has_any_keyword};
