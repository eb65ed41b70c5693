//! ListSessionsHandler - summarize all stored sessions.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::detection::ScamType;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::{EndedReason, SessionStatus};
use crate::ports::{SessionStore, StoreError};

/// One row of the session listing.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub status: SessionStatus,
    pub scam_type: Option<ScamType>,
    pub confidence: u8,
    pub turn_count: u32,
    pub started_at: Timestamp,
    pub ended_reason: Option<EndedReason>,
}

/// Lists sessions for observability endpoints.
pub struct ListSessionsHandler {
    store: Arc<dyn SessionStore>,
}

impl ListSessionsHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let ids = self.store.ids().await?;
        let snapshots = futures::future::join_all(ids.into_iter().map(|id| async move {
            // A session may disappear between listing and lookup; skip it.
            let handle = self.store.get(&id).await.ok()?;
            let session = handle.lock().await;
            Some(SessionSummary {
                id: session.id().clone(),
                status: session.status(),
                scam_type: session.scam_type(),
                confidence: session.confidence(),
                turn_count: session.turn_count(),
                started_at: *session.started_at(),
                ended_reason: session.ended_reason(),
            })
        }))
        .await;

        let mut summaries: Vec<SessionSummary> = snapshots.into_iter().flatten().collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }
}
