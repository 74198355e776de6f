//! Session providers
//!
//! A [`SessionService`] owns session records. The in-memory provider is the
//! default; see [`super::SqliteSessionService`] for a persistent one.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::llm::Message;
use crate::session::Session;
use crate::{Error, Result};

/// Storage backend for sessions
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Create and store a new session
    async fn create_session(&self, app_name: &str, user_id: &str) -> Result<Session>;

    /// Fetch a live session by id
    async fn get_session(&self, session_id: &str) -> Result<Session>;

    /// Append messages to a session's history
    async fn append_history(&self, session_id: &str, messages: Vec<Message>) -> Result<()>;

    /// Most recently updated session stored for `user_id`.
    ///
    /// Providers that do not outlive the process have nothing to recover and
    /// return `None`.
    async fn latest_for_user(&self, _user_id: &str) -> Result<Option<Session>> {
        Ok(None)
    }
}

/// Process-local session provider; everything is lost on restart
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionService {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn create_session(&self, app_name: &str, user_id: &str) -> Result<Session> {
        let session = Session::new(app_name, user_id);
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn get_session(&self, session_id: &str) -> Result<Session> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))
    }

    async fn append_history(&self, session_id: &str, messages: Vec<Message>) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;

        for message in messages {
            session.add_message(message);
        }
        Ok(())
    }
}
