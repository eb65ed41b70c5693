//! The scam detector.

use super::patterns::{
    self, CONTEXT_WEIGHT, LEGITIMATE_PENALTY, RED_FLAG_BONUS, SCORE_SCALE,
};
use super::{DetectionResult, ScamType};

/// Default engagement threshold when none is configured.
pub const DEFAULT_THRESHOLD: u8 = 60;

/// Scores raw text against weighted category patterns.
///
/// Pure and stateless apart from the configured threshold; a single instance
/// may be shared freely across concurrent sessions.
#[derive(Debug, Clone)]
pub struct ScamDetector {
    threshold: u8,
}

/// Per-category score used for winner selection and tie-breaking.
struct CategoryScore {
    scam_type: ScamType,
    /// Raw match count in the current message (context matches excluded).
    match_count: usize,
    /// Weighted score including context matches.
    weighted: f64,
    matched: Vec<String>,
}

impl Default for ScamDetector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ScamDetector {
    /// Creates a detector with the given engagement threshold.
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    /// Returns the configured engagement threshold.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Analyzes a single message with no prior context.
    pub fn detect(&self, text: &str) -> DetectionResult {
        self.detect_with_context(text, &[])
    }

    /// Analyzes a message, letting prior scammer turns contribute at reduced
    /// weight.
    ///
    /// Empty or whitespace-only input yields the negative result: no
    /// categories, no red flags, confidence zero.
    pub fn detect_with_context(&self, text: &str, prior_turns: &[&str]) -> DetectionResult {
        if text.trim().is_empty() {
            return DetectionResult::negative();
        }

        let text_lower = text.to_lowercase();
        let context_lower = prior_turns.join(" ").to_lowercase();

        let red_flags = patterns::red_flags_in(text);
        let legitimate = patterns::legitimate_indicator_count(&text_lower);

        let best = ScamType::ALL
            .iter()
            .map(|&scam_type| Self::score_category(scam_type, &text_lower, &context_lower))
            .filter(|score| score.weighted > 0.0)
            // Highest weighted score wins; ties break by raw match count,
            // then by the fixed priority order (lower index is stronger).
            .max_by(|a, b| {
                a.weighted
                    .total_cmp(&b.weighted)
                    .then(a.match_count.cmp(&b.match_count))
                    .then(b.scam_type.priority().cmp(&a.scam_type.priority()))
            });

        let Some(best) = best else {
            return DetectionResult::negative_with_flags(red_flags);
        };

        let confidence = DetectionResult::clamp_confidence(
            best.weighted * SCORE_SCALE + red_flags.len() as f64 * RED_FLAG_BONUS
                - legitimate as f64 * LEGITIMATE_PENALTY,
        );
        let is_scam = confidence >= self.threshold;

        DetectionResult {
            is_scam,
            confidence,
            scam_type: is_scam.then_some(best.scam_type),
            matched_patterns: best.matched,
            red_flags,
        }
    }

    fn score_category(scam_type: ScamType, text_lower: &str, context_lower: &str) -> CategoryScore {
        let mut match_count = 0usize;
        let mut context_count = 0usize;
        let mut matched = Vec::new();

        for keyword in scam_type.keywords() {
            if text_lower.contains(keyword) {
                match_count += 1;
                matched.push((*keyword).to_string());
            } else if !context_lower.is_empty() && context_lower.contains(keyword) {
                context_count += 1;
            }
        }

        let weighted =
            (match_count as f64 + context_count as f64 * CONTEXT_WEIGHT) * scam_type.weight();

        CategoryScore {
            scam_type,
            match_count,
            weighted,
            matched,
        }
    }
}
