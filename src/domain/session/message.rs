//! Conversation messages.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Scammer,
    Agent,
}

/// One message in a session's history. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub timestamp: Timestamp,
}

impl Message {
    /// Creates a scammer-authored message.
    pub fn from_scammer(text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            sender: Sender::Scammer,
            text: text.into(),
            timestamp,
        }
    }

    /// Creates an agent-authored message.
    pub fn from_agent(text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            sender: Sender::Agent,
            text: text.into(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::Scammer).unwrap(), "\"scammer\"");
        assert_eq!(serde_json::to_string(&Sender::Agent).unwrap(), "\"agent\"");
    }
}
