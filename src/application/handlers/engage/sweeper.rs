//! Idle session sweep.
//!
//! Engaged sessions whose adversary stopped writing would otherwise sit
//! open forever; a periodic sweep applies the same termination policy (and
//! the same exactly-once finalization) that inbound turns use.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::engagement::TerminationPolicy;
use crate::domain::foundation::Timestamp;
use crate::ports::SessionStore;

use super::SessionFinalizer;

/// Periodically finalizes sessions the termination policy says are done.
pub struct IdleSweeper {
    store: Arc<dyn SessionStore>,
    policy: TerminationPolicy,
    finalizer: SessionFinalizer,
    interval: Duration,
}

impl IdleSweeper {
    pub fn new(
        store: Arc<dyn SessionStore>,
        policy: TerminationPolicy,
        finalizer: SessionFinalizer,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            policy,
            finalizer,
            interval,
        }
    }

    /// Runs the sweep loop forever. Spawn this on its own task.
    pub async fn run(self) {
        loop {
            tokio::time::sleep(self.interval).await;
            self.sweep_once().await;
        }
    }

    /// One pass over the store. Returns how many sessions were finalized.
    pub async fn sweep_once(&self) -> usize {
        let ids = match self.store.ids().await {
            Ok(ids) => ids,
            Err(err) => {
                warn!(error = %err, "sweep could not list sessions");
                return 0;
            }
        };

        let now = Timestamp::now();
        let mut finalized = 0;
        for id in ids {
            let Ok(handle) = self.store.get(&id).await else {
                continue;
            };
            let mut session = handle.lock().await;
            if session.status().is_terminated() {
                continue;
            }
            if let Some(reason) = self.policy.evaluate(&session, now) {
                if self.finalizer.finalize(&mut session, reason) {
                    finalized += 1;
                }
            }
        }

        if finalized > 0 {
            debug!(finalized, "idle sweep finalized sessions");
        }
        finalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemorySessionStore, RecordingReporter};
    use crate::domain::detection::ScamType;
    use crate::domain::foundation::{PersonaId, SessionId};
    use crate::domain::session::EndedReason;

    fn sweeper_with_timeout(
        store: Arc<InMemorySessionStore>,
        reporter: Arc<RecordingReporter>,
        timeout_secs: u64,
    ) -> IdleSweeper {
        IdleSweeper::new(
            store,
            TerminationPolicy::new(20, timeout_secs, 1, 1),
            SessionFinalizer::new(reporter),
            Duration::from_secs(60),
        )
    }

    async fn engaged_session(store: &InMemorySessionStore, id: &str, started_at: Timestamp) {
        let (handle, _) = store
            .get_or_create(&SessionId::new(id).unwrap(), started_at)
            .await
            .unwrap();
        let mut session = handle.lock().await;
        session.begin_detection().unwrap();
        session
            .engage(ScamType::BankingFraud, 90, PersonaId::new("elderly_user").unwrap())
            .unwrap();
    }

    #[tokio::test]
    async fn sweep_finalizes_timed_out_sessions() {
        let store = Arc::new(InMemorySessionStore::new());
        let reporter = Arc::new(RecordingReporter::new());
        // Session started long ago relative to a 60 second timeout.
        let stale_start = Timestamp::from_unix_millis(0);
        engaged_session(&store, "stale", stale_start).await;

        let sweeper = sweeper_with_timeout(store.clone(), reporter.clone(), 60);
        assert_eq!(sweeper.sweep_once().await, 1);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(reporter.submissions().len(), 1);

        let handle = store.get(&SessionId::new("stale").unwrap()).await.unwrap();
        let session = handle.lock().await;
        assert_eq!(session.ended_reason(), Some(EndedReason::SessionTimeout));
    }

    #[tokio::test]
    async fn sweep_leaves_fresh_sessions_alone() {
        let store = Arc::new(InMemorySessionStore::new());
        let reporter = Arc::new(RecordingReporter::new());
        engaged_session(&store, "fresh", Timestamp::now()).await;

        let sweeper = sweeper_with_timeout(store.clone(), reporter.clone(), 3_600);
        assert_eq!(sweeper.sweep_once().await, 0);
        assert!(reporter.submissions().is_empty());
    }

    #[tokio::test]
    async fn sweep_skips_already_terminated_sessions() {
        let store = Arc::new(InMemorySessionStore::new());
        let reporter = Arc::new(RecordingReporter::new());
        let stale_start = Timestamp::from_unix_millis(0);
        engaged_session(&store, "done", stale_start).await;

        let sweeper = sweeper_with_timeout(store.clone(), reporter.clone(), 60);
        assert_eq!(sweeper.sweep_once().await, 1);
        // A second pass finds nothing to do and sends nothing new.
        assert_eq!(sweeper.sweep_once().await, 0);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(reporter.submissions().len(), 1);
    }
}
