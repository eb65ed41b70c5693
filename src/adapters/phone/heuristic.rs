//! Built-in phone normalization.
//!
//! A local, always-available implementation of the phone validation port.
//! It accepts explicit international numbers and, for the "IN" default
//! region, the mobile shapes that actually show up in scam messages.
//! Everything else is rejected so the extractor discards the candidate.

use crate::ports::{PhoneValidationError, PhoneValidator};

/// E.164 length bounds (digits, excluding the plus).
const E164_MIN_DIGITS: usize = 8;
const E164_MAX_DIGITS: usize = 15;

/// Offline heuristic phone validator.
#[derive(Debug, Clone, Default)]
pub struct HeuristicPhoneValidator;

impl HeuristicPhoneValidator {
    pub fn new() -> Self {
        Self
    }

    fn normalize_indian(digits: &str) -> Option<String> {
        let mobile_start = |c: char| matches!(c, '6'..='9');
        match digits.len() {
            // Bare mobile number.
            10 if digits.starts_with(mobile_start) => Some(format!("+91{}", digits)),
            // Trunk prefix 0 then the mobile number.
            11 if digits.starts_with('0') && digits[1..].starts_with(mobile_start) => {
                Some(format!("+91{}", &digits[1..]))
            }
            // Country code written without the plus.
            12 if digits.starts_with("91") && digits[2..].starts_with(mobile_start) => {
                Some(format!("+{}", digits))
            }
            _ => None,
        }
    }
}

impl PhoneValidator for HeuristicPhoneValidator {
    fn normalize(
        &self,
        candidate: &str,
        default_region: &str,
    ) -> Result<String, PhoneValidationError> {
        let trimmed = candidate.trim();
        let has_country_code = trimmed.starts_with('+');
        let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

        if has_country_code {
            if (E164_MIN_DIGITS..=E164_MAX_DIGITS).contains(&digits.len())
                && !digits.starts_with('0')
            {
                return Ok(format!("+{}", digits));
            }
            return Err(PhoneValidationError::Invalid(candidate.to_string()));
        }

        if default_region.eq_ignore_ascii_case("IN") {
            if let Some(normalized) = Self::normalize_indian(&digits) {
                return Ok(normalized);
            }
        }

        Err(PhoneValidationError::Invalid(candidate.to_string()))
    }
}
