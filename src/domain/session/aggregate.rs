//! Session aggregate entity.
//!
//! One session tracks one engagement with one adversary, keyed by an
//! externally-supplied id. All mutation goes through the methods below so
//! the state machine can hold its invariants.

use serde::{Deserialize, Serialize};

use crate::domain::detection::ScamType;
use crate::domain::foundation::{DomainError, ErrorCode, PersonaId, SessionId, Timestamp};
use crate::domain::intel::IntelligenceRecord;

use super::{EndedReason, Message, SessionStatus};

/// Per-conversation state machine.
///
/// # Invariants
///
/// - `status` only moves forward: `New < Detecting < Engaged < Terminated`
/// - `turn_count` is monotonic non-decreasing
/// - message history is append-only
/// - once `Terminated`, no field mutates; `terminate` is idempotent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    status: SessionStatus,
    scam_type: Option<ScamType>,
    confidence: u8,
    persona_id: Option<PersonaId>,
    turn_count: u32,
    started_at: Timestamp,
    messages: Vec<Message>,
    intelligence: IntelligenceRecord,
    ended_reason: Option<EndedReason>,
}

impl Session {
    /// Creates a fresh session for the first message of a conversation.
    pub fn new(id: SessionId, now: Timestamp) -> Self {
        Self {
            id,
            status: SessionStatus::New,
            scam_type: None,
            confidence: 0,
            persona_id: None,
            turn_count: 0,
            started_at: now,
            messages: Vec::new(),
            intelligence: IntelligenceRecord::new(),
            ended_reason: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn scam_type(&self) -> Option<ScamType> {
        self.scam_type
    }

    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    pub fn persona_id(&self) -> Option<&PersonaId> {
        self.persona_id.as_ref()
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn intelligence(&self) -> &IntelligenceRecord {
        &self.intelligence
    }

    pub fn ended_reason(&self) -> Option<EndedReason> {
        self.ended_reason
    }

    /// Whether the first scam detection marked this session as a scam.
    pub fn scam_detected(&self) -> bool {
        self.scam_type.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Enters detection on the first inbound message.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` if the session is terminated
    /// - `InvalidStateTransition` if detection already ran
    pub fn begin_detection(&mut self) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.transition_to(SessionStatus::Detecting)
    }

    /// Records the detector's confidence while in `Detecting`.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` outside `Detecting`
    pub fn record_detection(&mut self, confidence: u8) -> Result<(), DomainError> {
        if self.status != SessionStatus::Detecting {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Detection results can only be recorded while detecting",
            ));
        }
        self.confidence = confidence;
        Ok(())
    }

    /// Engages the adversary: the detector cleared the threshold and a
    /// persona was chosen. Sets `turn_count` to 1.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` outside `Detecting`
    pub fn engage(
        &mut self,
        scam_type: ScamType,
        confidence: u8,
        persona_id: PersonaId,
    ) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.transition_to(SessionStatus::Engaged)?;
        self.scam_type = Some(scam_type);
        self.confidence = confidence;
        self.persona_id = Some(persona_id);
        self.turn_count = 1;
        Ok(())
    }

    /// Appends a message to the history.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` if the session is terminated
    pub fn append_message(&mut self, message: Message) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.messages.push(message);
        Ok(())
    }

    /// Union-merges extracted intelligence into the session record.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` if the session is terminated
    pub fn merge_intelligence(&mut self, record: IntelligenceRecord) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.intelligence.merge(record);
        Ok(())
    }

    /// Advances the turn counter after a reply was generated.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` outside `Engaged`
    pub fn increment_turn(&mut self) -> Result<u32, DomainError> {
        if self.status != SessionStatus::Engaged {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Turns only advance while engaged",
            ));
        }
        self.turn_count += 1;
        Ok(self.turn_count)
    }

    /// Terminates the session.
    ///
    /// Idempotent: returns `true` only for the call that performed the
    /// transition, `false` for every later call. The caller that receives
    /// `true` owns finalization (exactly-once reporting).
    pub fn terminate(&mut self, reason: EndedReason) -> bool {
        if self.status.is_terminated() {
            return false;
        }
        self.status = SessionStatus::Terminated;
        self.ended_reason = Some(reason);
        true
    }

    /// Rejects further processing for terminated sessions.
    ///
    /// # Errors
    ///
    /// - `SessionClosed`, a recoverable signal for the caller
    pub fn ensure_active(&self) -> Result<(), DomainError> {
        if self.status.is_terminated() {
            Err(DomainError::session_closed(&self.id))
        } else {
            Ok(())
        }
    }

    fn transition_to(&mut self, next: SessionStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition from {} to {}", self.status, next),
            ));
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::Sender;

    fn session() -> Session {
        Session::new(SessionId::new("test-session").unwrap(), Timestamp::now())
    }

    fn persona() -> PersonaId {
        PersonaId::new("elderly_user").unwrap()
    }

    fn engaged_session() -> Session {
        let mut s = session();
        s.begin_detection().unwrap();
        s.engage(ScamType::BankingFraud, 85, persona()).unwrap();
        s
    }

    // Construction

    #[test]
    fn new_session_starts_fresh() {
        let s = session();
        assert_eq!(s.status(), SessionStatus::New);
        assert_eq!(s.turn_count(), 0);
        assert!(s.messages().is_empty());
        assert!(s.intelligence().is_empty());
        assert!(s.ended_reason().is_none());
    }

    // Transitions

    #[test]
    fn detection_then_engage_sets_first_turn() {
        let s = engaged_session();
        assert_eq!(s.status(), SessionStatus::Engaged);
        assert_eq!(s.turn_count(), 1);
        assert_eq!(s.scam_type(), Some(ScamType::BankingFraud));
        assert_eq!(s.confidence(), 85);
        assert!(s.scam_detected());
    }

    #[test]
    fn engage_without_detection_is_rejected() {
        let mut s = session();
        assert!(s.engage(ScamType::BankingFraud, 85, persona()).is_err());
    }

    #[test]
    fn detection_cannot_run_twice() {
        let mut s = engaged_session();
        assert!(s.begin_detection().is_err());
    }

    #[test]
    fn record_detection_only_while_detecting() {
        let mut s = session();
        assert!(s.record_detection(10).is_err());
        s.begin_detection().unwrap();
        assert!(s.record_detection(10).is_ok());
        assert_eq!(s.confidence(), 10);
    }

    // Turns and history

    #[test]
    fn turn_count_is_monotonic() {
        let mut s = engaged_session();
        let mut last = s.turn_count();
        for _ in 0..5 {
            let next = s.increment_turn().unwrap();
            assert!(next > last);
            last = next;
        }
    }

    #[test]
    fn turns_do_not_advance_before_engagement() {
        let mut s = session();
        assert!(s.increment_turn().is_err());
    }

    #[test]
    fn messages_append_in_order() {
        let mut s = engaged_session();
        s.append_message(Message::from_scammer("pay up", Timestamp::now()))
            .unwrap();
        s.append_message(Message::from_agent("oh dear", Timestamp::now()))
            .unwrap();
        assert_eq!(s.messages().len(), 2);
        assert_eq!(s.messages()[0].sender, Sender::Scammer);
        assert_eq!(s.messages()[1].sender, Sender::Agent);
    }

    // Termination

    #[test]
    fn terminate_is_idempotent() {
        let mut s = engaged_session();
        assert!(s.terminate(EndedReason::MaxTurns));
        assert!(!s.terminate(EndedReason::SessionTimeout));
        // The first reason sticks.
        assert_eq!(s.ended_reason(), Some(EndedReason::MaxTurns));
    }

    #[test]
    fn terminated_session_rejects_all_mutation() {
        let mut s = engaged_session();
        let before = s.clone();
        s.terminate(EndedReason::SufficientIntelligence);

        assert!(s.append_message(Message::from_scammer("hello?", Timestamp::now())).is_err());
        assert!(s.merge_intelligence(IntelligenceRecord::new()).is_err());
        assert!(s.increment_turn().is_err());
        assert!(s.begin_detection().is_err());

        // Nothing but status and reason changed.
        assert_eq!(s.turn_count(), before.turn_count());
        assert_eq!(s.messages(), before.messages());
        assert_eq!(s.intelligence(), before.intelligence());
    }

    #[test]
    fn terminated_session_reports_session_closed() {
        let mut s = session();
        s.terminate(EndedReason::NotAScam);
        let err = s.ensure_active().unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionClosed);
    }

    #[test]
    fn new_session_can_terminate_directly() {
        let mut s = session();
        s.begin_detection().unwrap();
        assert!(s.terminate(EndedReason::NotAScam));
        assert_eq!(s.status(), SessionStatus::Terminated);
    }

    #[test]
    fn status_never_moves_backward() {
        let mut s = engaged_session();
        s.terminate(EndedReason::MaxTurns);
        assert_eq!(s.status(), SessionStatus::Terminated);
        // Every mutating entry point fails; status stays terminal.
        let _ = s.begin_detection();
        let _ = s.engage(ScamType::UpiPayment, 90, persona());
        assert_eq!(s.status(), SessionStatus::Terminated);
    }
}
