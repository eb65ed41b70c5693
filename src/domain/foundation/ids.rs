//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Maximum length accepted for an externally-supplied session id.
pub const MAX_SESSION_ID_LENGTH: usize = 128;

/// Unique identifier for an engagement session.
///
/// Session ids arrive from the external API layer as opaque strings, so this
/// wraps a validated string rather than a locally-generated UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a SessionId from an externally-supplied string.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the id is empty or whitespace
    /// - `InvalidFormat` if the id exceeds the maximum length
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("session_id"));
        }
        if trimmed.len() > MAX_SESSION_ID_LENGTH {
            return Err(ValidationError::invalid_format(
                "session_id",
                format!("exceeds {} characters", MAX_SESSION_ID_LENGTH),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Identifier for a decoy persona in the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonaId(String);

impl PersonaId {
    /// Creates a PersonaId.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the id is empty or whitespace
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("persona_id"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PersonaId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_accepts_opaque_strings() {
        let id = SessionId::new("wa-chat-8812").unwrap();
        assert_eq!(id.as_str(), "wa-chat-8812");
    }

    #[test]
    fn session_id_trims_whitespace() {
        let id = SessionId::new("  abc-123  ").unwrap();
        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn session_id_rejects_empty() {
        assert!(SessionId::new("").is_err());
        assert!(SessionId::new("   ").is_err());
    }

    #[test]
    fn session_id_rejects_oversized() {
        let long = "x".repeat(MAX_SESSION_ID_LENGTH + 1);
        assert!(SessionId::new(long).is_err());
    }

    #[test]
    fn session_id_orders_lexicographically() {
        let a = SessionId::new("a").unwrap();
        let b = SessionId::new("b").unwrap();
        assert!(a < b);
    }

    #[test]
    fn persona_id_rejects_empty() {
        assert!(PersonaId::new(" ").is_err());
    }
}
