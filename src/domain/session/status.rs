//! Session lifecycle status and termination reasons.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a session.
///
/// The declaration order is the lifecycle order: a session only ever moves
/// forward, and `Terminated` has no outgoing transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    New,
    Detecting,
    Engaged,
    Terminated,
}

impl SessionStatus {
    /// Whether moving from this status to `next` is a legal transition.
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (*self, next),
            (New, Detecting)
                | (Detecting, Engaged)
                | (New, Terminated)
                | (Detecting, Terminated)
                | (Engaged, Terminated)
        )
    }

    /// True once the session is terminal.
    pub fn is_terminated(&self) -> bool {
        matches!(self, SessionStatus::Terminated)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::New => "NEW",
            SessionStatus::Detecting => "DETECTING",
            SessionStatus::Engaged => "ENGAGED",
            SessionStatus::Terminated => "TERMINATED",
        };
        write!(f, "{}", s)
    }
}

/// Why a session ended.
///
/// The termination policy is evaluated in a fixed order, so the recorded
/// reason is always the first trigger that held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndedReason {
    /// The first message never cleared the engagement threshold.
    NotAScam,
    /// The configured turn limit was reached.
    MaxTurns,
    /// Wall-clock session timeout elapsed.
    SessionTimeout,
    /// Enough payment and contact artifacts were collected.
    SufficientIntelligence,
    /// An operator ended the session explicitly.
    Manual,
}

impl fmt::Display for EndedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EndedReason::NotAScam => "not_a_scam",
            EndedReason::MaxTurns => "max_turns",
            EndedReason::SessionTimeout => "session_timeout",
            EndedReason::SufficientIntelligence => "sufficient_intelligence",
            EndedReason::Manual => "manual",
        };
        write!(f, "{}", s)
    }
}
