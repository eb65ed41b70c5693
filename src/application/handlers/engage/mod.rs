//! Engagement handlers - the conversation engine's application surface.

mod drive_conversation;
mod end_session;
mod finalizer;
mod get_session;
mod list_sessions;
mod process_turn;
mod sweeper;

pub use drive_conversation::{
    DriveConversationError, DriveConversationHandler, DriveOutcome,
};
pub use end_session::{EndSessionError, EndSessionHandler};
pub use finalizer::SessionFinalizer;
pub use get_session::{GetSessionError, GetSessionHandler};
pub use list_sessions::{ListSessionsHandler, SessionSummary};
pub use process_turn::{ProcessTurnError, ProcessTurnHandler, TurnCommand, TurnOutcome};
pub use sweeper::IdleSweeper;
