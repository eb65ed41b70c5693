//! Session finalization.
//!
//! Every path that terminates a session (turn policy, manual end, idle
//! sweep) goes through here, so the exactly-once guarantee lives in one
//! place: only the caller whose `terminate` performed the transition builds
//! and dispatches the report.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::engagement::FinalReport;
use crate::domain::session::{EndedReason, Session};
use crate::ports::Reporter;

/// Terminates sessions and dispatches their final report.
#[derive(Clone)]
pub struct SessionFinalizer {
    reporter: Arc<dyn Reporter>,
}

impl SessionFinalizer {
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self { reporter }
    }

    /// Terminates `session` and hands the report off.
    ///
    /// Must run while the caller holds the session's exclusive handle.
    /// Returns `true` only when this call performed the transition; a
    /// `false` means someone else already finalized and no report is sent.
    ///
    /// Delivery happens on a detached task so a slow reporting endpoint
    /// never stalls the reply already computed for this turn. A delivery
    /// failure is logged; the session's terminal state is never revisited.
    pub fn finalize(&self, session: &mut Session, reason: EndedReason) -> bool {
        if !session.terminate(reason) {
            return false;
        }

        info!(
            session_id = %session.id(),
            %reason,
            turns = session.turn_count(),
            "session terminated"
        );

        let report = FinalReport::from_session(session);
        let reporter = Arc::clone(&self.reporter);
        tokio::spawn(async move {
            if let Err(err) = reporter.submit(&report).await {
                warn!(
                    session_id = %report.session_id,
                    error = %err,
                    "final report could not be delivered"
                );
            }
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RecordingReporter;
    use crate::domain::foundation::{SessionId, Timestamp};
    use std::time::Duration;

    fn session() -> Session {
        Session::new(SessionId::new("finalize-test").unwrap(), Timestamp::now())
    }

    #[tokio::test]
    async fn finalize_terminates_and_reports_once() {
        let reporter = Arc::new(RecordingReporter::new());
        let finalizer = SessionFinalizer::new(reporter.clone());
        let mut session = session();

        assert!(finalizer.finalize(&mut session, EndedReason::Manual));
        assert!(session.status().is_terminated());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(reporter.submissions().len(), 1);
    }

    #[tokio::test]
    async fn second_finalize_is_a_no_op() {
        let reporter = Arc::new(RecordingReporter::new());
        let finalizer = SessionFinalizer::new(reporter.clone());
        let mut session = session();

        assert!(finalizer.finalize(&mut session, EndedReason::Manual));
        assert!(!finalizer.finalize(&mut session, EndedReason::MaxTurns));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(reporter.submissions().len(), 1);
        assert_eq!(session.ended_reason(), Some(EndedReason::Manual));
    }

    #[tokio::test]
    async fn delivery_failure_leaves_session_terminated() {
        let reporter = Arc::new(RecordingReporter::failing_first(5));
        let finalizer = SessionFinalizer::new(reporter.clone());
        let mut session = session();

        assert!(finalizer.finalize(&mut session, EndedReason::SessionTimeout));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(session.status().is_terminated());
        assert_eq!(session.ended_reason(), Some(EndedReason::SessionTimeout));
    }
}
