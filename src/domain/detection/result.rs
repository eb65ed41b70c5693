//! Detection result value object.

use serde::{Deserialize, Serialize};

use super::ScamType;

/// Outcome of scoring one message against the category tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Whether the winning category cleared the engagement threshold.
    pub is_scam: bool,
    /// Normalized confidence, always within 0..=100.
    pub confidence: u8,
    /// Winning category, present only when `is_scam` is true.
    pub scam_type: Option<ScamType>,
    /// Patterns of the winning category that matched, in table order.
    pub matched_patterns: Vec<String>,
    /// Red flags found, independent of any category threshold.
    pub red_flags: Vec<String>,
}

impl DetectionResult {
    /// The negative result for empty or unmatched input.
    pub fn negative() -> Self {
        Self {
            is_scam: false,
            confidence: 0,
            scam_type: None,
            matched_patterns: Vec::new(),
            red_flags: Vec::new(),
        }
    }

    /// A negative result that still carries the red flags found.
    pub fn negative_with_flags(red_flags: Vec<String>) -> Self {
        Self {
            red_flags,
            ..Self::negative()
        }
    }

    /// Clamps an unnormalized score into the 0..=100 confidence range.
    pub fn clamp_confidence(score: f64) -> u8 {
        score.round().clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_result_is_all_empty() {
        let result = DetectionResult::negative();
        assert!(!result.is_scam);
        assert_eq!(result.confidence, 0);
        assert!(result.scam_type.is_none());
        assert!(result.matched_patterns.is_empty());
        assert!(result.red_flags.is_empty());
    }

    #[test]
    fn clamp_confidence_bounds_both_ends() {
        assert_eq!(DetectionResult::clamp_confidence(-5.0), 0);
        assert_eq!(DetectionResult::clamp_confidence(42.4), 42);
        assert_eq!(DetectionResult::clamp_confidence(250.0), 100);
    }
}
