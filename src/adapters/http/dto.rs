//! Wire types for the REST surface.

use serde::{Deserialize, Serialize};

use crate::application::handlers::engage::SessionSummary;
use crate::domain::intel::IntelligenceRecord;
use crate::domain::session::{Message, Sender, Session};

/// One message in the inbound wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub sender: Option<String>,
    pub text: String,
    /// Epoch milliseconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Channel metadata forwarded by the API layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnMetadata {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

/// The inbound turn contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoneypotRequest {
    pub session_id: String,
    pub message: InboundMessage,
    #[serde(default)]
    pub conversation_history: Vec<InboundMessage>,
    #[serde(default)]
    pub metadata: Option<TurnMetadata>,
}

impl HoneypotRequest {
    /// Prior scammer-authored texts from the replayed history.
    pub fn prior_scammer_turns(&self) -> Vec<String> {
        self.conversation_history
            .iter()
            .filter(|m| {
                m.sender
                    .as_deref()
                    .map(|s| s.eq_ignore_ascii_case("scammer"))
                    .unwrap_or(true)
            })
            .map(|m| m.text.clone())
            .collect()
    }
}

/// Turn response; terminal turns also carry the closure markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoneypotResponse {
    pub status: String,
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_reason: Option<String>,
}

impl HoneypotResponse {
    pub fn engaged(reply: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            reply: reply.into(),
            session_status: None,
            ended_reason: None,
        }
    }

    pub fn terminal(reply: impl Into<String>, ended_reason: Option<String>) -> Self {
        Self {
            status: "success".to_string(),
            reply: reply.into(),
            session_status: Some("TERMINATED".to_string()),
            ended_reason,
        }
    }
}

/// Uniform error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn unauthorized() -> Self {
        Self::new("UNAUTHORIZED", "Invalid or missing API key")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("SESSION_NOT_FOUND", message)
    }

    pub fn session_closed(message: impl Into<String>) -> Self {
        Self::new("SESSION_CLOSED", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

/// Liveness payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub active_sessions: usize,
}

/// Full session detail for observability.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetailResponse {
    pub session_id: String,
    pub status: String,
    pub scam_type: Option<String>,
    pub confidence: u8,
    pub persona_id: Option<String>,
    pub turn_count: u32,
    pub ended_reason: Option<String>,
    pub intelligence: IntelligenceRecord,
    pub messages: Vec<MessageDto>,
}

/// One history entry in session detail.
#[derive(Debug, Clone, Serialize)]
pub struct MessageDto {
    pub sender: String,
    pub text: String,
    pub timestamp: i64,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            sender: match message.sender {
                Sender::Scammer => "scammer".to_string(),
                Sender::Agent => "agent".to_string(),
            },
            text: message.text.clone(),
            timestamp: message.timestamp.as_unix_millis(),
        }
    }
}

impl From<&Session> for SessionDetailResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id().to_string(),
            status: session.status().to_string(),
            scam_type: session.scam_type().map(|t| t.to_string()),
            confidence: session.confidence(),
            persona_id: session.persona_id().map(|p| p.to_string()),
            turn_count: session.turn_count(),
            ended_reason: session.ended_reason().map(|r| r.to_string()),
            intelligence: session.intelligence().clone(),
            messages: session.messages().iter().map(MessageDto::from).collect(),
        }
    }
}

/// Session listing payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListResponse {
    pub active_sessions: usize,
    pub sessions: Vec<SessionSummary>,
}

/// Request to drive one scripted conversation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    #[serde(default)]
    pub scam_type: Option<String>,
}

/// Outcome of a driven conversation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    pub session_id: String,
    pub exchanges: u32,
    pub status: String,
    pub ended_reason: Option<String>,
}
