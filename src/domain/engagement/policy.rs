//! Termination policy.
//!
//! Conditions are evaluated in a fixed order so the recorded trigger reason
//! is deterministic: turn limit first, then wall-clock timeout, then the
//! sufficient-intelligence rule.

use crate::domain::foundation::Timestamp;
use crate::domain::session::{EndedReason, Session};

/// Decides when an engaged session should stop.
#[derive(Debug, Clone)]
pub struct TerminationPolicy {
    max_turns: u32,
    session_timeout_secs: u64,
    /// Minimum payment-identifying artifacts (bank account, UPI handle, or
    /// crypto address) for the sufficient-intelligence rule.
    sufficient_payment_artifacts: usize,
    /// Minimum contact-identifying artifacts (phone number or URL).
    sufficient_contact_artifacts: usize,
}

impl TerminationPolicy {
    /// Creates a policy. Counts for the sufficient-intelligence rule are
    /// configurable; 1 and 1 reproduce the classic one-of-each rule.
    pub fn new(
        max_turns: u32,
        session_timeout_secs: u64,
        sufficient_payment_artifacts: usize,
        sufficient_contact_artifacts: usize,
    ) -> Self {
        Self {
            max_turns,
            session_timeout_secs,
            sufficient_payment_artifacts,
            sufficient_contact_artifacts,
        }
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    pub fn session_timeout_secs(&self) -> u64 {
        self.session_timeout_secs
    }

    /// Returns the first trigger that holds, or `None` to keep engaging.
    pub fn evaluate(&self, session: &Session, now: Timestamp) -> Option<EndedReason> {
        if session.turn_count() >= self.max_turns {
            return Some(EndedReason::MaxTurns);
        }
        if now.seconds_since(session.started_at()) > self.session_timeout_secs {
            return Some(EndedReason::SessionTimeout);
        }
        if self.has_sufficient_intelligence(session) {
            return Some(EndedReason::SufficientIntelligence);
        }
        None
    }

    /// The sufficient-intelligence rule on its own.
    pub fn has_sufficient_intelligence(&self, session: &Session) -> bool {
        let intel = session.intelligence();
        intel.payment_artifact_count() >= self.sufficient_payment_artifacts
            && intel.contact_artifact_count() >= self.sufficient_contact_artifacts
    }

    /// True once either half of the sufficient-intelligence rule is met.
    ///
    /// The reply selector consults this to switch to stalling phrasing while
    /// the haul is nearly complete.
    pub fn is_near_sufficient(&self, session: &Session) -> bool {
        let intel = session.intelligence();
        intel.payment_artifact_count() >= self.sufficient_payment_artifacts
            || intel.contact_artifact_count() >= self.sufficient_contact_artifacts
    }
}

impl Default for TerminationPolicy {
    fn default() -> Self {
        Self::new(20, 1_800, 1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detection::ScamType;
    use crate::domain::foundation::{PersonaId, SessionId};
    use crate::domain::intel::IntelligenceRecord;

    fn engaged_session(started_at: Timestamp) -> Session {
        let mut s = Session::new(SessionId::new("policy-test").unwrap(), started_at);
        s.begin_detection().unwrap();
        s.engage(
            ScamType::BankingFraud,
            90,
            PersonaId::new("elderly_user").unwrap(),
        )
        .unwrap();
        s
    }

    fn payment_and_contact_intel() -> IntelligenceRecord {
        let mut intel = IntelligenceRecord::new();
        intel.upi_handles.insert("x@paytm".to_string());
        intel.urls.insert("http://phish.example".to_string());
        intel
    }

    #[test]
    fn fresh_session_continues() {
        let now = Timestamp::now();
        let session = engaged_session(now);
        assert_eq!(TerminationPolicy::default().evaluate(&session, now), None);
    }

    #[test]
    fn turn_limit_fires_exactly_at_max_turns() {
        let now = Timestamp::now();
        let mut session = engaged_session(now);
        let policy = TerminationPolicy::new(5, 3_600, 1, 1);

        while session.turn_count() < 4 {
            session.increment_turn().unwrap();
        }
        assert_eq!(policy.evaluate(&session, now), None);

        session.increment_turn().unwrap();
        assert_eq!(session.turn_count(), 5);
        assert_eq!(policy.evaluate(&session, now), Some(EndedReason::MaxTurns));
    }

    #[test]
    fn turn_limit_fires_regardless_of_intelligence() {
        let now = Timestamp::now();
        let mut session = engaged_session(now);
        session.merge_intelligence(payment_and_contact_intel()).unwrap();
        let policy = TerminationPolicy::new(1, 3_600, 1, 1);

        // Turn limit is checked first, so it wins over sufficient intel.
        assert_eq!(policy.evaluate(&session, now), Some(EndedReason::MaxTurns));
    }

    #[test]
    fn timeout_fires_after_configured_seconds() {
        let started = Timestamp::from_unix_millis(0);
        let session = engaged_session(started);
        let policy = TerminationPolicy::new(20, 600, 1, 1);

        let just_inside = started.plus_secs(600);
        assert_eq!(policy.evaluate(&session, just_inside), None);

        let past = started.plus_secs(601);
        assert_eq!(
            policy.evaluate(&session, past),
            Some(EndedReason::SessionTimeout)
        );
    }

    #[test]
    fn sufficient_intelligence_needs_payment_and_contact() {
        let now = Timestamp::now();
        let policy = TerminationPolicy::new(20, 3_600, 1, 1);

        let mut payment_only = engaged_session(now);
        let mut intel = IntelligenceRecord::new();
        intel.upi_handles.insert("x@paytm".to_string());
        payment_only.merge_intelligence(intel).unwrap();
        assert_eq!(policy.evaluate(&payment_only, now), None);

        let mut both = engaged_session(now);
        both.merge_intelligence(payment_and_contact_intel()).unwrap();
        assert_eq!(
            policy.evaluate(&both, now),
            Some(EndedReason::SufficientIntelligence)
        );
    }

    #[test]
    fn artifact_minimums_are_configurable() {
        let now = Timestamp::now();
        let strict = TerminationPolicy::new(20, 3_600, 2, 1);

        let mut session = engaged_session(now);
        session.merge_intelligence(payment_and_contact_intel()).unwrap();
        // One payment artifact is not enough under the stricter policy.
        assert_eq!(strict.evaluate(&session, now), None);

        let mut more = IntelligenceRecord::new();
        more.upi_handles.insert("y@ybl".to_string());
        session.merge_intelligence(more).unwrap();
        assert_eq!(
            strict.evaluate(&session, now),
            Some(EndedReason::SufficientIntelligence)
        );
    }
}
