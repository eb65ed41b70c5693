//! In-memory session store.
//!
//! Sessions live in a map guarded by an outer `RwLock`; each entry is an
//! `Arc<Mutex<Session>>`. The outer lock is held only to look the handle up,
//! so turns for different session ids run fully in parallel while turns for
//! the same id serialize on the per-session mutex.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::Session;
use crate::ports::{SessionHandle, SessionStore, StoreError};

/// Single-process session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(
        &self,
        id: &SessionId,
        now: Timestamp,
    ) -> Result<(SessionHandle, bool), StoreError> {
        {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(id) {
                return Ok((Arc::clone(handle), false));
            }
        }

        let mut sessions = self.sessions.write().await;
        // Another task may have created the session between the two locks.
        if let Some(handle) = sessions.get(id) {
            return Ok((Arc::clone(handle), false));
        }
        let handle: SessionHandle = Arc::new(Mutex::new(Session::new(id.clone(), now)));
        sessions.insert(id.clone(), Arc::clone(&handle));
        Ok((handle, true))
    }

    async fn get(&self, id: &SessionId) -> Result<SessionHandle, StoreError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(id)
            .map(Arc::clone)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn ids(&self) -> Result<Vec<SessionId>, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.keys().cloned().collect())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> SessionId {
        SessionId::new(s).unwrap()
    }

    #[tokio::test]
    async fn first_access_creates_the_session() {
        let store = InMemorySessionStore::new();
        let (_, created) = store.get_or_create(&id("a"), Timestamp::now()).await.unwrap();
        assert!(created);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn second_access_reuses_the_session() {
        let store = InMemorySessionStore::new();
        let now = Timestamp::now();
        let (first, _) = store.get_or_create(&id("a"), now).await.unwrap();
        let (second, created) = store.get_or_create(&id("a"), now).await.unwrap();
        assert!(!created);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let store = InMemorySessionStore::new();
        assert!(matches!(
            store.get(&id("missing")).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_creates_converge_on_one_handle() {
        let store = Arc::new(InMemorySessionStore::new());
        let now = Timestamp::now();

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.get_or_create(&id("same"), now).await.unwrap().0
            }));
        }

        let handles: Vec<SessionHandle> =
            futures::future::join_all(tasks).await.into_iter().map(|h| h.unwrap()).collect();
        assert_eq!(store.count().await.unwrap(), 1);
        for handle in &handles[1..] {
            assert!(Arc::ptr_eq(&handles[0], handle));
        }
    }

    #[tokio::test]
    async fn same_session_mutations_serialize() {
        use crate::domain::detection::ScamType;
        use crate::domain::foundation::PersonaId;

        let store = Arc::new(InMemorySessionStore::new());
        let now = Timestamp::now();
        let (handle, _) = store.get_or_create(&id("serial"), now).await.unwrap();
        {
            let mut session = handle.lock().await;
            session.begin_detection().unwrap();
            session
                .engage(ScamType::BankingFraud, 90, PersonaId::new("elderly_user").unwrap())
                .unwrap();
        }

        let mut tasks = Vec::new();
        for _ in 0..10 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                let handle = store.get(&id("serial")).await.unwrap();
                let mut session = handle.lock().await;
                session.increment_turn().unwrap();
            }));
        }
        futures::future::join_all(tasks).await;

        let session = handle.lock().await;
        // engage() set turn 1; ten serialized increments, no lost updates.
        assert_eq!(session.turn_count(), 11);
    }

    #[tokio::test]
    async fn different_sessions_do_not_block_each_other() {
        let store = InMemorySessionStore::new();
        let now = Timestamp::now();
        let (a, _) = store.get_or_create(&id("a"), now).await.unwrap();
        let (b, _) = store.get_or_create(&id("b"), now).await.unwrap();

        // Holding one session's lock must not stop access to the other.
        let _guard_a = a.lock().await;
        let guard_b = tokio::time::timeout(std::time::Duration::from_millis(50), b.lock()).await;
        assert!(guard_b.is_ok());
    }
}
