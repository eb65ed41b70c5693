//! Scammer channel port.
//!
//! A single polymorphic interface over the medium that delivers scammer
//! messages, implemented by two interchangeable adapters (live HTTP and the
//! local simulator) chosen once at construction and never branched on per
//! call.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::detection::ScamType;

/// A conversation opened on the channel.
#[derive(Debug, Clone)]
pub struct ChannelSession {
    /// Channel-assigned conversation identifier.
    pub channel_id: String,
    /// The scammer's opening message.
    pub opening_message: String,
    /// The scenario the channel is playing, when it knows.
    pub scam_type: Option<ScamType>,
}

/// Errors from the scammer channel.
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    #[error("channel conversation {0} not found")]
    NotFound(String),

    #[error("channel request timed out after {0} seconds")]
    Timeout(u64),

    #[error("channel transport failure: {0}")]
    Transport(String),
}

/// Port for conversing with the adversary's side.
#[async_trait]
pub trait ScammerChannel: Send + Sync {
    /// Opens a conversation, optionally steering the scenario.
    async fn start_conversation(
        &self,
        scam_type: Option<ScamType>,
    ) -> Result<ChannelSession, ChannelError>;

    /// Delivers the decoy's message into the conversation.
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), ChannelError>;

    /// Fetches the scammer's next message.
    ///
    /// `None` means the other side has gone silent and the conversation
    /// should wind down.
    async fn get_response(&self, channel_id: &str) -> Result<Option<String>, ChannelError>;

    /// Closes the conversation on the channel side.
    async fn end_conversation(&self, channel_id: &str) -> Result<(), ChannelError>;
}
