//! Display names for mailbox labels.

use inflections::case::to_title_case;
use mailsort_core::MailboxLabel;

/// Prefix of the mailbox's built-in category labels.
pub const CATEGORY_PREFIX: &str = "CATEGORY_";

/// Built-in category labels with a display name that differs from the
/// title-cased suffix.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("CATEGORY_PERSONAL", "Primary"),
    ("CATEGORY_SOCIAL", "Social"),
    ("CATEGORY_PROMOTIONS", "Promotions"),
    ("CATEGORY_UPDATES", "Updates"),
    ("CATEGORY_FORUMS", "Forums"),
];

/// Human-readable name for a raw label name.
///
/// Known `CATEGORY_*` names come from the lookup table, other `CATEGORY_*`
/// names lose the prefix and have each underscore-separated word title-cased
/// (`CATEGORY_TRAVEL_DEALS` becomes `Travel_Deals`). Anything else is
/// returned as is.
pub fn display_name(raw_name: &str) -> String {
    if let Some((_, name)) = DISPLAY_NAMES.iter().find(|(raw, _)| *raw == raw_name) {
        return name.to_string();
    }
    match raw_name.strip_prefix(CATEGORY_PREFIX) {
        Some(rest) => rest
            .split('_')
            .map(to_title_case)
            .collect::<Vec<_>>()
            .join("_"),
        None => raw_name.to_string(),
    }
}

/// Whether a mailbox label can serve as a classification target: user
/// labels, and system labels in the `CATEGORY_` family.
pub fn is_classifiable(label: &MailboxLabel) -> bool {
    label.is_user() || (label.is_system() && label.name.starts_with(CATEGORY_PREFIX))
}
