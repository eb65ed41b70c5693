//! ProcessTurnHandler - drive one inbound message through the state machine.

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::detection::ScamDetector;
use crate::domain::engagement::{
    Perturbation, ReplyContext, ReplyGenerator, TerminationPolicy, CLOSING_REPLY, NEUTRAL_REPLY,
};
use crate::domain::foundation::{
    DomainError, ErrorCode, PersonaId, SessionId, Timestamp,
};
use crate::domain::intel::IntelligenceExtractor;
use crate::domain::persona::PersonaSelector;
use crate::domain::session::{EndedReason, Message, Session, SessionStatus};
use crate::ports::{Reporter, SessionStore, StoreError};

use super::SessionFinalizer;

/// One inbound scammer message.
#[derive(Debug, Clone)]
pub struct TurnCommand {
    pub session_id: SessionId,
    pub text: String,
    pub timestamp: Timestamp,
    /// Prior scammer turns supplied by the caller for detection context;
    /// replayed, never re-validated.
    pub prior_turns: Vec<String>,
}

/// What the engine decided for this turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub status: SessionStatus,
    pub ended_reason: Option<EndedReason>,
}

/// Error type for turn processing.
#[derive(Debug, Clone)]
pub enum ProcessTurnError {
    /// The session is terminated; a recoverable signal, not a fault.
    SessionClosed(SessionId),
    /// Store failure.
    Store(String),
    /// Domain invariant violation.
    Domain(DomainError),
}

impl std::fmt::Display for ProcessTurnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessTurnError::SessionClosed(id) => write!(f, "Session {} is closed", id),
            ProcessTurnError::Store(msg) => write!(f, "Store error: {}", msg),
            ProcessTurnError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ProcessTurnError {}

impl ProcessTurnError {
    fn from_domain(err: DomainError, session_id: &SessionId) -> Self {
        if err.code == ErrorCode::SessionClosed {
            ProcessTurnError::SessionClosed(session_id.clone())
        } else {
            ProcessTurnError::Domain(err)
        }
    }
}

impl From<StoreError> for ProcessTurnError {
    fn from(err: StoreError) -> Self {
        ProcessTurnError::Store(err.to_string())
    }
}

/// The conversation engine.
///
/// Holds the per-session lock for the whole read-modify-write of a turn, so
/// same-session requests serialize while different sessions run in parallel.
pub struct ProcessTurnHandler {
    store: Arc<dyn SessionStore>,
    detector: ScamDetector,
    extractor: IntelligenceExtractor,
    selector: PersonaSelector,
    replies: ReplyGenerator,
    perturbation: Perturbation,
    policy: TerminationPolicy,
    finalizer: SessionFinalizer,
    /// Configured persona pin; a valid override always wins selection.
    persona_override: Option<PersonaId>,
}

impl ProcessTurnHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn SessionStore>,
        reporter: Arc<dyn Reporter>,
        detector: ScamDetector,
        extractor: IntelligenceExtractor,
        selector: PersonaSelector,
        policy: TerminationPolicy,
        persona_override: Option<PersonaId>,
    ) -> Self {
        Self {
            store,
            detector,
            extractor,
            selector,
            replies: ReplyGenerator::new(),
            perturbation: Perturbation::new(),
            policy,
            finalizer: SessionFinalizer::new(reporter),
            persona_override,
        }
    }

    /// Shares this handler's finalizer (manual end and sweep use the same
    /// exactly-once path).
    pub fn finalizer(&self) -> SessionFinalizer {
        self.finalizer.clone()
    }

    /// Shares the underlying session store.
    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    pub async fn handle(&self, cmd: TurnCommand) -> Result<TurnOutcome, ProcessTurnError> {
        let now = Timestamp::now();
        let (handle, created) = self.store.get_or_create(&cmd.session_id, now).await?;
        let mut session = handle.lock().await;

        if created {
            debug!(session_id = %cmd.session_id, "session created");
        }

        match session.status() {
            SessionStatus::Terminated => {
                Err(ProcessTurnError::SessionClosed(cmd.session_id.clone()))
            }
            SessionStatus::New => self.first_turn(&mut session, &cmd, now),
            SessionStatus::Engaged => self.follow_up_turn(&mut session, &cmd, now),
            // Detecting never outlives the first turn's lock scope.
            SessionStatus::Detecting => Err(ProcessTurnError::Domain(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Session is mid-detection",
            ))),
        }
    }

    /// First message: run detection, then either bail out politely or pick
    /// a persona and open the engagement.
    fn first_turn(
        &self,
        session: &mut Session,
        cmd: &TurnCommand,
        now: Timestamp,
    ) -> Result<TurnOutcome, ProcessTurnError> {
        let map = |err| ProcessTurnError::from_domain(err, &cmd.session_id);

        session.begin_detection().map_err(map)?;

        let prior: Vec<&str> = cmd.prior_turns.iter().map(String::as_str).collect();
        let detection = self.detector.detect_with_context(&cmd.text, &prior);

        session
            .append_message(Message::from_scammer(cmd.text.clone(), cmd.timestamp))
            .map_err(map)?;
        session.record_detection(detection.confidence).map_err(map)?;

        if !detection.is_scam {
            info!(
                session_id = %cmd.session_id,
                confidence = detection.confidence,
                "below engagement threshold, not engaging"
            );
            self.finalizer.finalize(session, EndedReason::NotAScam);
            return Ok(TurnOutcome {
                reply: NEUTRAL_REPLY.to_string(),
                status: session.status(),
                ended_reason: session.ended_reason(),
            });
        }

        let scam_type = detection
            .scam_type
            .expect("a positive detection always carries its category");
        let persona = self
            .selector
            .select(Some(scam_type), self.persona_override.as_ref());

        session
            .engage(scam_type, detection.confidence, persona.id.clone())
            .map_err(map)?;
        session
            .merge_intelligence(self.extractor.extract(&cmd.text))
            .map_err(map)?;

        info!(
            session_id = %cmd.session_id,
            %scam_type,
            confidence = detection.confidence,
            persona = %persona.id,
            "engaging"
        );

        let reply = self
            .perturbation
            .apply(&self.replies.opening(persona, scam_type));
        session
            .append_message(Message::from_agent(reply.clone(), now))
            .map_err(map)?;

        Ok(TurnOutcome {
            reply,
            status: session.status(),
            ended_reason: None,
        })
    }

    /// Engaged self-loop: harvest, append, check the termination policy,
    /// then either close out or keep the adversary talking.
    fn follow_up_turn(
        &self,
        session: &mut Session,
        cmd: &TurnCommand,
        now: Timestamp,
    ) -> Result<TurnOutcome, ProcessTurnError> {
        let map = |err| ProcessTurnError::from_domain(err, &cmd.session_id);

        let intel_before = session.intelligence().high_value_count();
        session
            .merge_intelligence(self.extractor.extract(&cmd.text))
            .map_err(map)?;
        session
            .append_message(Message::from_scammer(cmd.text.clone(), cmd.timestamp))
            .map_err(map)?;
        let captured_new_intel = session.intelligence().high_value_count() > intel_before;

        if let Some(reason) = self.policy.evaluate(session, now) {
            self.finalizer.finalize(session, reason);
            return Ok(TurnOutcome {
                reply: CLOSING_REPLY.to_string(),
                status: session.status(),
                ended_reason: session.ended_reason(),
            });
        }

        let persona = self
            .selector
            .select(session.scam_type(), session.persona_id());
        let ctx = ReplyContext {
            turn: session.turn_count(),
            captured_new_intel,
            near_sufficient: self.policy.is_near_sufficient(session),
        };

        let reply = self
            .perturbation
            .apply(&self.replies.follow_up(persona, &ctx));
        session
            .append_message(Message::from_agent(reply.clone(), now))
            .map_err(map)?;
        let turn = session.increment_turn().map_err(map)?;

        debug!(
            session_id = %cmd.session_id,
            turn,
            captured_new_intel,
            "turn complete"
        );

        Ok(TurnOutcome {
            reply,
            status: session.status(),
            ended_reason: None,
        })
    }
}
