//! Phone validation port.
//!
//! Phone-number grammar validation is an external capability: the extractor
//! hands over raw candidates and keeps only what the capability accepts.
//! Implementations must be internally time-bounded; a failure applies to the
//! single candidate, never to the extraction as a whole.

use thiserror::Error;

/// Errors from the phone validation capability.
#[derive(Debug, Clone, Error)]
pub enum PhoneValidationError {
    /// The candidate is not a dialable number. The caller discards it.
    #[error("candidate '{0}' is not a dialable number")]
    Invalid(String),

    /// The capability itself failed. The caller discards the candidate
    /// rather than propagating.
    #[error("phone validation unavailable: {0}")]
    Unavailable(String),
}

/// Port for validating and normalizing phone-number candidates.
pub trait PhoneValidator: Send + Sync {
    /// Normalizes a raw candidate into E.164 form.
    ///
    /// `default_region` (an ISO 3166-1 alpha-2 code, e.g. "IN") applies when
    /// the candidate carries no explicit country code.
    ///
    /// # Errors
    ///
    /// - `Invalid` when the candidate cannot be a dialable number
    /// - `Unavailable` when the capability itself failed
    fn normalize(&self, candidate: &str, default_region: &str)
        -> Result<String, PhoneValidationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_validator_is_object_safe() {
        fn _accepts_dyn(_validator: &dyn PhoneValidator) {}
    }
}
