//! Session types

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm::Message;

/// A caller's conversation with the assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier
    pub id: String,
    /// Application namespace the session was created under
    pub app_name: String,
    /// Caller or user identifier owning the session
    pub user_id: String,
    /// Conversation so far (user and assistant turns)
    pub history: Vec<Message>,
    /// Provider-internal state
    #[serde(default)]
    pub state: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new, empty session
    pub fn new(app_name: impl Into<String>, user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            app_name: app_name.into(),
            user_id: user_id.into(),
            history: Vec::new(),
            state: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a message to the history
    pub fn add_message(&mut self, message: Message) {
        self.history.push(message);
        self.updated_at = Utc::now();
    }

    /// The last `limit` messages, oldest first
    pub fn recent_history(&self, limit: usize) -> &[Message] {
        let start = self.history.len().saturating_sub(limit);
        &self.history[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = Session::new("voice-agent", "+15550100");
        assert!(!session.id.is_empty());
        assert_eq!(session.app_name, "voice-agent");
        assert_eq!(session.user_id, "+15550100");
        assert!(session.history.is_empty());
    }

    #[test]
    fn test_recent_history() {
        let mut session = Session::new("voice-agent", "caller");
        for i in 0..5 {
            session.add_message(Message::user(format!("message {}", i)));
        }

        let recent = session.recent_history(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].text_content(), "message 3");
        assert!(session.recent_history(0).is_empty());
        assert_eq!(session.recent_history(50).len(), 5);
    }
}
