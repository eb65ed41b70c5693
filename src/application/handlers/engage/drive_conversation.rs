//! DriveConversationHandler - run a whole engagement against the channel.
//!
//! Opens a conversation on the scammer channel, feeds every message it
//! produces through the turn engine, and relays the engine's replies back
//! until either side stops. The channel behind the port may be the local
//! simulator or a live relay; this handler never knows which.

use std::sync::Arc;
use tracing::info;

use crate::domain::detection::ScamType;
use crate::domain::foundation::{SessionId, Timestamp, ValidationError};
use crate::domain::session::{EndedReason, SessionStatus};
use crate::ports::{ChannelError, ScammerChannel};

use super::{ProcessTurnError, ProcessTurnHandler, SessionFinalizer, TurnCommand};

/// Upper bound on exchanges per driven conversation, independent of the
/// engine's own turn policy.
const MAX_EXCHANGES: u32 = 64;

/// Result of one driven conversation.
#[derive(Debug, Clone)]
pub struct DriveOutcome {
    pub session_id: SessionId,
    pub exchanges: u32,
    pub status: SessionStatus,
    pub ended_reason: Option<EndedReason>,
}

/// Error type for driven conversations.
#[derive(Debug, Clone)]
pub enum DriveConversationError {
    Channel(ChannelError),
    Engine(String),
    InvalidChannelId(String),
}

impl std::fmt::Display for DriveConversationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriveConversationError::Channel(err) => write!(f, "Channel error: {}", err),
            DriveConversationError::Engine(msg) => write!(f, "Engine error: {}", msg),
            DriveConversationError::InvalidChannelId(id) => {
                write!(f, "Channel returned an unusable conversation id: {}", id)
            }
        }
    }
}

impl std::error::Error for DriveConversationError {}

impl From<ChannelError> for DriveConversationError {
    fn from(err: ChannelError) -> Self {
        DriveConversationError::Channel(err)
    }
}

/// Drives complete conversations through the engagement engine.
pub struct DriveConversationHandler {
    channel: Arc<dyn ScammerChannel>,
    turn_handler: Arc<ProcessTurnHandler>,
    finalizer: SessionFinalizer,
}

impl DriveConversationHandler {
    pub fn new(
        channel: Arc<dyn ScammerChannel>,
        turn_handler: Arc<ProcessTurnHandler>,
    ) -> Self {
        let finalizer = turn_handler.finalizer();
        Self {
            channel,
            turn_handler,
            finalizer,
        }
    }

    pub async fn handle(
        &self,
        scam_type: Option<ScamType>,
    ) -> Result<DriveOutcome, DriveConversationError> {
        let opened = self.channel.start_conversation(scam_type).await?;
        let session_id = SessionId::new(&opened.channel_id)
            .map_err(|e: ValidationError| DriveConversationError::InvalidChannelId(e.to_string()))?;

        info!(
            session_id = %session_id,
            scam_type = ?opened.scam_type,
            "driving scripted conversation"
        );

        let mut inbound = opened.opening_message;
        let mut exchanges: u32 = 0;
        let mut last_status = SessionStatus::New;
        let mut ended_reason = None;

        while exchanges < MAX_EXCHANGES {
            exchanges += 1;
            let outcome = self
                .turn_handler
                .handle(TurnCommand {
                    session_id: session_id.clone(),
                    text: inbound.clone(),
                    timestamp: Timestamp::now(),
                    prior_turns: Vec::new(),
                })
                .await;

            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(ProcessTurnError::SessionClosed(_)) => break,
                Err(err) => return Err(DriveConversationError::Engine(err.to_string())),
            };

            last_status = outcome.status;
            ended_reason = outcome.ended_reason;
            if outcome.status.is_terminated() {
                break;
            }

            self.channel
                .send_message(&opened.channel_id, &outcome.reply)
                .await?;
            match self.channel.get_response(&opened.channel_id).await? {
                Some(next) => inbound = next,
                None => {
                    // The scammer went silent; close our side out.
                    ended_reason = self.finalize_silent(&session_id).await;
                    last_status = SessionStatus::Terminated;
                    break;
                }
            }
        }

        // Best effort; the script may already be gone.
        let _ = self.channel.end_conversation(&opened.channel_id).await;

        Ok(DriveOutcome {
            session_id,
            exchanges,
            status: last_status,
            ended_reason,
        })
    }

    async fn finalize_silent(&self, session_id: &SessionId) -> Option<EndedReason> {
        let handle = self.turn_handler.store().get(session_id).await.ok()?;
        let mut session = handle.lock().await;
        self.finalizer.finalize(&mut session, EndedReason::Manual);
        session.ended_reason()
    }
}
