//! Domain and keyword tables consulted by the rule engine.
//!
//! Keywords are lower-case and matched as substrings.

/// Social networking and media-sharing sites.
pub const SOCIAL_DOMAINS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "linkedin.com",
    "instagram.com",
    "pinterest.com",
    "snapchat.com",
    "tiktok.com",
    "tumblr.com",
    "reddit.com",
    "discord.com",
    "slack.com",
    "meetup.com",
];

/// Free email providers used for personal accounts.
pub const FREE_EMAIL_PROVIDERS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "yahoo.com",
    "outlook.com",
    "hotmail.com",
    "live.com",
    "msn.com",
    "aol.com",
    "icloud.com",
    "protonmail.com",
    "yandex.com",
    "zoho.com",
];

/// Bulk-marketing platforms, matched as a suffix of the sender domain.
pub const MARKETING_DOMAIN_SUFFIXES: &[&str] = &["mailchimp.com", "sendgrid.net", "emarketing.com"];

pub const SOCIAL_KEYWORDS: &[&str] = &[
    "new follower",
    "friend request",
    "mentioned you",
    "tagged you",
    "commented",
    "liked your",
    "shared",
    "join us",
];

pub const PROMOTION_KEYWORDS: &[&str] = &[
    "sale",
    "deal",
    "discount",
    "offer",
    "promo",
    "coupon",
    "subscribe",
    "subscription",
    "save",
    "free",
    "limited time",
    "special",
    "clearance",
    "bargain",
    "order now",
    "unlimited",
];

/// Receipts, confirmations, shipping and bookings.
pub const UPDATES_KEYWORDS: &[&str] = &[
    "invoice",
    "receipt",
    "order",
    "confirmation",
    "confirm",
    "shipping",
    "shipment",
    "tracking",
    "itinerary",
    "bill",
    "payment",
    "statement",
    "notice",
    "reminder",
    "ticket",
    "appointment",
    "reservation",
    "booking",
    "schedule",
];

/// Forum, digest and mailing-list markers.
pub const FORUM_KEYWORDS: &[&str] = &[
    "digest",
    "discussion",
    "forum",
    "mailing list",
    "newsletter",
    "community",
    "thread",
    "re: [",
    "[list]",
    "[forum]",
];

/// Header names checked for mailing-list membership. Matching is exact on
/// these three spellings only.
pub const LIST_ID_HEADERS: &[&str] = &["List-Id", "List-id", "List-ID"];
