//! GetSessionHandler - read one session's full state.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{SessionStore, StoreError};

/// Error type for session lookup.
#[derive(Debug, Clone)]
pub enum GetSessionError {
    NotFound(SessionId),
    Store(String),
}

impl std::fmt::Display for GetSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetSessionError::NotFound(id) => write!(f, "Session {} not found", id),
            GetSessionError::Store(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for GetSessionError {}

impl From<StoreError> for GetSessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => GetSessionError::NotFound(id),
            other => GetSessionError::Store(other.to_string()),
        }
    }
}

/// Returns a point-in-time snapshot of one session.
pub struct GetSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, session_id: &SessionId) -> Result<Session, GetSessionError> {
        let handle = self.store.get(session_id).await?;
        let session = handle.lock().await;
        Ok(session.clone())
    }
}
