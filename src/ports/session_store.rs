//! Session store port.
//!
//! The store hands out per-session handles with exclusive-access semantics:
//! callers lock the handle for the whole read-modify-write of a turn, so two
//! inbound requests for the same session id can never interleave their
//! updates of `turn_count` or `status`, while requests for different ids
//! proceed fully in parallel.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::Session;

/// Exclusive handle to one session.
///
/// Holding the lock serializes every mutation for that session id,
/// including concurrent termination triggers and the idle-timeout sweep.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Errors from the session store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("session {0} not found")]
    NotFound(SessionId),

    #[error("session store failure: {0}")]
    Backend(String),
}

/// Port for shared session state keyed by session id.
///
/// Sessions are created on the first message for a given id and destroyed
/// only by an external retention policy.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the handle for `id`, creating a fresh session when absent.
    ///
    /// The boolean is true when this call created the session.
    async fn get_or_create(
        &self,
        id: &SessionId,
        now: Timestamp,
    ) -> Result<(SessionHandle, bool), StoreError>;

    /// Returns the handle for an existing session.
    ///
    /// # Errors
    ///
    /// - `NotFound` when no session exists for `id`
    async fn get(&self, id: &SessionId) -> Result<SessionHandle, StoreError>;

    /// Lists the ids of all stored sessions.
    async fn ids(&self) -> Result<Vec<SessionId>, StoreError>;

    /// Number of stored sessions.
    async fn count(&self) -> Result<usize, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }
}
