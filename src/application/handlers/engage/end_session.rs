//! EndSessionHandler - operator-initiated session termination.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::session::EndedReason;
use crate::ports::{SessionStore, StoreError};

use super::SessionFinalizer;

/// Error type for manual session termination.
#[derive(Debug, Clone)]
pub enum EndSessionError {
    /// No session exists for the id.
    NotFound(SessionId),
    /// The session is already terminated.
    AlreadyClosed(SessionId),
    /// Store failure.
    Store(String),
}

impl std::fmt::Display for EndSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndSessionError::NotFound(id) => write!(f, "Session {} not found", id),
            EndSessionError::AlreadyClosed(id) => write!(f, "Session {} is already closed", id),
            EndSessionError::Store(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for EndSessionError {}

impl From<StoreError> for EndSessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => EndSessionError::NotFound(id),
            other => EndSessionError::Store(other.to_string()),
        }
    }
}

/// Ends a session on request and sends its final report.
pub struct EndSessionHandler {
    store: Arc<dyn SessionStore>,
    finalizer: SessionFinalizer,
}

impl EndSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>, finalizer: SessionFinalizer) -> Self {
        Self { store, finalizer }
    }

    pub async fn handle(&self, session_id: &SessionId) -> Result<EndedReason, EndSessionError> {
        let handle = self.store.get(session_id).await?;
        let mut session = handle.lock().await;

        if self.finalizer.finalize(&mut session, EndedReason::Manual) {
            Ok(EndedReason::Manual)
        } else {
            Err(EndSessionError::AlreadyClosed(session_id.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemorySessionStore, RecordingReporter};
    use crate::domain::foundation::Timestamp;
    use std::time::Duration;

    fn id(s: &str) -> SessionId {
        SessionId::new(s).unwrap()
    }

    async fn setup() -> (EndSessionHandler, Arc<InMemorySessionStore>, Arc<RecordingReporter>) {
        let store = Arc::new(InMemorySessionStore::new());
        let reporter = Arc::new(RecordingReporter::new());
        let handler = EndSessionHandler::new(
            store.clone(),
            SessionFinalizer::new(reporter.clone()),
        );
        (handler, store, reporter)
    }

    #[tokio::test]
    async fn ends_a_live_session_and_reports() {
        let (handler, store, reporter) = setup().await;
        store.get_or_create(&id("s1"), Timestamp::now()).await.unwrap();

        let reason = handler.handle(&id("s1")).await.unwrap();
        assert_eq!(reason, EndedReason::Manual);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(reporter.submissions().len(), 1);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (handler, _, _) = setup().await;
        assert!(matches!(
            handler.handle(&id("ghost")).await,
            Err(EndSessionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn ending_twice_reports_already_closed() {
        let (handler, store, reporter) = setup().await;
        store.get_or_create(&id("s1"), Timestamp::now()).await.unwrap();

        handler.handle(&id("s1")).await.unwrap();
        assert!(matches!(
            handler.handle(&id("s1")).await,
            Err(EndSessionError::AlreadyClosed(_))
        ));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(reporter.submissions().len(), 1);
    }
}
