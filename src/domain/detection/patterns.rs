//! Category-independent heuristics and score shaping constants.

use once_cell::sync::Lazy;
use regex::Regex;

/// Multiplier from weighted raw match score to the 0-100 confidence scale.
pub const SCORE_SCALE: f64 = 12.0;

/// Confidence bonus per red flag found.
pub const RED_FLAG_BONUS: f64 = 8.0;

/// Confidence penalty per legitimate-language indicator found.
pub const LEGITIMATE_PENALTY: f64 = 20.0;

/// Weight applied to matches found only in prior turns, not the current text.
pub const CONTEXT_WEIGHT: f64 = 0.5;

/// Phrases that suggest ordinary, non-fraudulent correspondence.
pub const LEGITIMATE_INDICATORS: &[&str] = &[
    "meeting",
    "reminder about your",
    "invoice attached",
    "as discussed",
    "order has shipped",
    "appointment",
];

/// A category-independent red-flag heuristic.
///
/// Red flags are always evaluated and reported, whether or not any category
/// cleared the engagement threshold.
pub struct RedFlag {
    /// Stable label used as the prefix of the reported string.
    pub label: &'static str,
    pub pattern: &'static Lazy<Regex>,
}

static URGENCY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(urgent|immediately|right now|hurry|act fast|last chance|limited time|within \d+ (hours?|minutes?)|expire)\b")
        .expect("urgency pattern is valid")
});

static EMBEDDED_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://[^\s<>]+").expect("link pattern is valid"));

static THREAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(arrest(ed)?|legal action|lawsuit|blocked|suspended|penalty|warrant|seized?)\b")
        .expect("threat pattern is valid")
});

static AUTHORITY_CLAIM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(income tax department|reserve bank|police|government|official|cyber ?cell|customs|court order)\b")
        .expect("authority pattern is valid")
});

/// The fixed red-flag heuristic set, in reporting order.
pub static RED_FLAGS: &[RedFlag] = &[
    RedFlag {
        label: "urgency",
        pattern: &URGENCY,
    },
    RedFlag {
        label: "embedded_link",
        pattern: &EMBEDDED_LINK,
    },
    RedFlag {
        label: "threat",
        pattern: &THREAT,
    },
    RedFlag {
        label: "authority_claim",
        pattern: &AUTHORITY_CLAIM,
    },
];

/// Evaluates all red-flag heuristics against `text`.
///
/// Returns one entry per firing heuristic, `label: first-match` form,
/// in the fixed heuristic order.
pub fn red_flags_in(text: &str) -> Vec<String> {
    RED_FLAGS
        .iter()
        .filter_map(|flag| {
            flag.pattern
                .find(text)
                .map(|m| format!("{}: {}", flag.label, m.as_str().to_lowercase()))
        })
        .collect()
}

/// Counts legitimate-language indicators present in lowercased `text`.
pub fn legitimate_indicator_count(text_lower: &str) -> usize {
    LEGITIMATE_INDICATORS
        .iter()
        .filter(|indicator| text_lower.contains(*indicator))
        .count()
}
