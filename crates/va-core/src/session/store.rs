//! Caller to session mapping

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::Result;
use crate::session::{Session, SessionService};

/// Application namespace every session is created under
pub const APP_NAME: &str = "voice-agent";

/// Maps caller ids to their session and resolves live sessions from the provider.
///
/// Entries are never evicted. A caller missing from the map is looked up in the
/// provider first, so a persistent provider carries callers across restarts.
/// `get_or_create` does not hold the map lock while the provider creates a
/// session, so two concurrent first contacts from the same caller can both
/// create one; the later write replaces the mapping.
pub struct SessionStore {
    service: Arc<dyn SessionService>,
    app_name: String,
    sessions: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new(service: Arc<dyn SessionService>) -> Self {
        Self {
            service,
            app_name: APP_NAME.to_string(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the caller's session, creating one on first contact or when the
    /// recorded session can no longer be fetched.
    pub async fn get_or_create(&self, user_id: &str) -> Result<Session> {
        let known = self.sessions.read().await.get(user_id).cloned();

        match known {
            Some(session_id) => match self.service.get_session(&session_id).await {
                Ok(session) => {
                    debug!("Session {} found for {}", session.id, user_id);
                    return Ok(session);
                }
                Err(e) => {
                    warn!("Could not fetch session {} for {}: {}", session_id, user_id, e);
                }
            },
            None => {
                if let Some(session) = self.recover(user_id).await {
                    return Ok(session);
                }
            }
        }

        let session = self.service.create_session(&self.app_name, user_id).await?;
        info!("Created session {} for {}", session.id, user_id);

        self.sessions
            .write()
            .await
            .insert(user_id.to_string(), session.id.clone());

        Ok(session)
    }

    /// Whether the caller has been seen before, in this process or by the provider
    pub async fn exists(&self, user_id: &str) -> bool {
        if self.sessions.read().await.contains_key(user_id) {
            return true;
        }
        self.recover(user_id).await.is_some()
    }

    /// Adopt the provider's latest session for a caller the map does not know
    async fn recover(&self, user_id: &str) -> Option<Session> {
        let session = match self.service.latest_for_user(user_id).await {
            Ok(found) => found?,
            Err(e) => {
                warn!("Could not look up stored sessions for {}: {}", user_id, e);
                return None;
            }
        };

        info!("Restored session {} for {}", session.id, user_id);
        self.sessions
            .write()
            .await
            .entry(user_id.to_string())
            .or_insert_with(|| session.id.clone());
        Some(session)
    }

    /// Session id currently recorded for the caller
    pub async fn session_id_for(&self, user_id: &str) -> Option<String> {
        self.sessions.read().await.get(user_id).cloned()
    }

    /// Number of callers with a recorded session
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::llm::Message;
    use crate::session::{InMemorySessionService, SqliteSessionService};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn memory_store() -> SessionStore {
        SessionStore::new(Arc::new(InMemorySessionService::new()))
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = memory_store();

        let first = store.get_or_create("+15550100").await.unwrap();
        let second = store.get_or_create("+15550100").await.unwrap();
        let third = store.get_or_create("+15550100").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.id, third.id);
        assert_eq!(first.app_name, APP_NAME);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_callers_get_distinct_sessions() {
        let store = memory_store();

        let a = store.get_or_create("caller-a").await.unwrap();
        let b = store.get_or_create("caller-b").await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.session_id_for("caller-a").await, Some(a.id));
    }

    #[tokio::test]
    async fn test_exists() {
        let store = memory_store();
        assert!(!store.exists("caller").await);

        store.get_or_create("caller").await.unwrap();
        assert!(store.exists("caller").await);
    }

    /// Provider that forgets every session it created
    struct ForgetfulService {
        inner: InMemorySessionService,
        created: AtomicUsize,
    }

    #[async_trait]
    impl SessionService for ForgetfulService {
        async fn create_session(&self, app_name: &str, user_id: &str) -> Result<Session> {
            self.created.fetch_add(1, Ordering::SeqCst);
            self.inner.create_session(app_name, user_id).await
        }

        async fn get_session(&self, session_id: &str) -> Result<Session> {
            Err(Error::SessionNotFound(session_id.to_string()))
        }

        async fn append_history(&self, session_id: &str, messages: Vec<Message>) -> Result<()> {
            self.inner.append_history(session_id, messages).await
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_through_to_creation() {
        let service = Arc::new(ForgetfulService {
            inner: InMemorySessionService::new(),
            created: AtomicUsize::new(0),
        });
        let store = SessionStore::new(service.clone());

        let first = store.get_or_create("caller").await.unwrap();
        let second = store.get_or_create("caller").await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(service.created.load(Ordering::SeqCst), 2);
        assert_eq!(store.session_id_for("caller").await, Some(second.id));
    }

    /// Provider whose creations rendezvous, then finish in a fixed order
    struct RacingService {
        inner: InMemorySessionService,
        barrier: Barrier,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SessionService for RacingService {
        async fn create_session(&self, app_name: &str, user_id: &str) -> Result<Session> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.barrier.wait().await;
            if call == 1 {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            self.inner.create_session(app_name, user_id).await
        }

        async fn get_session(&self, session_id: &str) -> Result<Session> {
            self.inner.get_session(session_id).await
        }

        async fn append_history(&self, session_id: &str, messages: Vec<Message>) -> Result<()> {
            self.inner.append_history(session_id, messages).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_first_contact_last_write_wins() {
        let service = Arc::new(RacingService {
            inner: InMemorySessionService::new(),
            barrier: Barrier::new(2),
            calls: AtomicUsize::new(0),
        });
        let store = Arc::new(SessionStore::new(service.clone()));

        let (fast, slow) = tokio::join!(
            store.get_or_create("+15550199"),
            store.get_or_create("+15550199"),
        );
        let (fast, slow) = (fast.unwrap(), slow.unwrap());

        // Both calls created a session; the provider holds both.
        assert_ne!(fast.id, slow.id);
        assert_eq!(service.inner.len().await, 2);

        // Only the session written last stays addressable for the caller.
        let ids = [fast.id.clone(), slow.id.clone()];
        let mapped = store.session_id_for("+15550199").await.unwrap();
        assert!(ids.contains(&mapped));

        let late_id = if service.inner.get_session(&ids[0]).await.unwrap().created_at
            > service.inner.get_session(&ids[1]).await.unwrap().created_at
        {
            &ids[0]
        } else {
            &ids[1]
        };
        assert_eq!(&mapped, late_id);

        let again = store.get_or_create("+15550199").await.unwrap();
        assert_eq!(again.id, mapped);
    }

    #[tokio::test]
    async fn test_sqlite_sessions_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voice-desk.db");
        let path = path.to_str().unwrap();

        let before = {
            let service = Arc::new(SqliteSessionService::new(path).unwrap());
            let store = SessionStore::new(service.clone());
            let session = store.get_or_create("+15550001").await.unwrap();
            service
                .append_history(
                    &session.id,
                    vec![Message::user("What's my balance?"), Message::assistant("1245 rupees.")],
                )
                .await
                .unwrap();
            session
        };

        let store = SessionStore::new(Arc::new(SqliteSessionService::new(path).unwrap()));
        assert!(store.exists("+15550001").await);
        assert!(!store.exists("+15550002").await);

        let after = store.get_or_create("+15550001").await.unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.history.len(), 2);
        assert_eq!(store.session_id_for("+15550001").await, Some(before.id));
        assert_eq!(store.len().await, 1);
    }
}
