//! Session aggregate - the per-conversation state machine.

mod aggregate;
mod message;
mod status;

pub use aggregate::Session;
pub use message::{Message, Sender};
pub use status::{EndedReason, SessionStatus};
