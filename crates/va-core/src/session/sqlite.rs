//! Session persistence using SQLite

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::llm::Message;
use crate::session::{Session, SessionService};
use crate::{Error, Result};

/// SQLite-backed session provider
pub struct SqliteSessionService {
    conn: Mutex<Connection>,
}

impl SqliteSessionService {
    /// Open (or create) the database at `db_path`
    pub fn new(db_path: &str) -> Result<Self> {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::with_connection(Connection::open(db_path)?)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                app_name TEXT NOT NULL,
                user_id TEXT NOT NULL,
                history TEXT NOT NULL,
                state TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Other("session database lock poisoned".to_string()))
    }

    fn save(conn: &Connection, session: &Session) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO sessions (id, app_name, user_id, history, state, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                session.id,
                session.app_name,
                session.user_id,
                serde_json::to_string(&session.history)?,
                serde_json::to_string(&session.state)?,
                session.created_at.to_rfc3339(),
                session.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn load(conn: &Connection, id: &str) -> Result<Option<Session>> {
        let session = conn
            .query_row(
                "SELECT id, app_name, user_id, history, state, created_at, updated_at
                 FROM sessions WHERE id = ?1",
                params![id],
                row_to_session,
            )
            .optional()?;
        Ok(session)
    }

    fn load_latest(conn: &Connection, user_id: &str) -> Result<Option<Session>> {
        let session = conn
            .query_row(
                "SELECT id, app_name, user_id, history, state, created_at, updated_at
                 FROM sessions WHERE user_id = ?1
                 ORDER BY updated_at DESC, rowid DESC LIMIT 1",
                params![user_id],
                row_to_session,
            )
            .optional()?;
        Ok(session)
    }
}

fn parse_timestamp(value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| rusqlite::Error::InvalidQuery)
}

fn row_to_session(row: &Row<'_>) -> rusqlite::Result<Session> {
    let history: String = row.get(3)?;
    let state: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(Session {
        id: row.get(0)?,
        app_name: row.get(1)?,
        user_id: row.get(2)?,
        history: serde_json::from_str(&history).map_err(|_| rusqlite::Error::InvalidQuery)?,
        state: serde_json::from_str(&state).map_err(|_| rusqlite::Error::InvalidQuery)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

#[async_trait]
impl SessionService for SqliteSessionService {
    async fn create_session(&self, app_name: &str, user_id: &str) -> Result<Session> {
        let session = Session::new(app_name, user_id);
        Self::save(&*self.lock()?, &session)?;
        Ok(session)
    }

    async fn get_session(&self, session_id: &str) -> Result<Session> {
        Self::load(&*self.lock()?, session_id)?
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))
    }

    async fn append_history(&self, session_id: &str, messages: Vec<Message>) -> Result<()> {
        let conn = self.lock()?;
        let mut session = Self::load(&conn, session_id)?
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;

        for message in messages {
            session.add_message(message);
        }
        Self::save(&conn, &session)
    }

    async fn latest_for_user(&self, user_id: &str) -> Result<Option<Session>> {
        Self::load_latest(&*self.lock()?, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_load() {
        let service = SqliteSessionService::in_memory().unwrap();
        let session = service.create_session("voice-agent", "+15550100").await.unwrap();

        let loaded = service.get_session(&session.id).await.unwrap();
        assert_eq!(loaded.id, session.id);
        assert_eq!(loaded.app_name, "voice-agent");
        assert_eq!(loaded.user_id, "+15550100");
    }

    #[tokio::test]
    async fn test_missing_session() {
        let service = SqliteSessionService::in_memory().unwrap();
        let result = service.get_session("nope").await;
        assert!(matches!(result, Err(Error::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions/voice-desk.db");
        let path = path.to_str().unwrap();

        let session_id = {
            let service = SqliteSessionService::new(path).unwrap();
            let session = service.create_session("voice-agent", "caller").await.unwrap();
            service
                .append_history(&session.id, vec![Message::user("What's my balance?")])
                .await
                .unwrap();
            session.id
        };

        let reopened = SqliteSessionService::new(path).unwrap();
        let loaded = reopened.get_session(&session_id).await.unwrap();
        assert_eq!(loaded.history.len(), 1);
        assert_eq!(loaded.history[0].text_content(), "What's my balance?");
    }

    #[tokio::test]
    async fn test_latest_for_user() {
        let service = SqliteSessionService::in_memory().unwrap();
        assert!(service.latest_for_user("caller").await.unwrap().is_none());

        let older = service.create_session("voice-agent", "caller").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newer = service.create_session("voice-agent", "caller").await.unwrap();
        service.create_session("voice-agent", "someone-else").await.unwrap();

        let latest = service.latest_for_user("caller").await.unwrap().unwrap();
        assert_eq!(latest.id, newer.id);

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        service
            .append_history(&older.id, vec![Message::user("still here")])
            .await
            .unwrap();
        let latest = service.latest_for_user("caller").await.unwrap().unwrap();
        assert_eq!(latest.id, older.id);
    }
}
