//! JSON handlers: local chat and health

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::server::AppState;

/// Caller id used when a local chat request names none
pub const LOCAL_USER: &str = "local_user";

/// Local chat request payload
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub text: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Local chat response payload
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Error body for failed local chat requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// `POST /local/chat`
pub async fn local_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorDetail>)> {
    info!("Local Chat: {}", req.text);
    let user_id = req.user_id.as_deref().unwrap_or(LOCAL_USER);

    let session = state.sessions.get_or_create(user_id).await.map_err(|e| {
        error!("Local Error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDetail {
                detail: e.to_string(),
            }),
        )
    })?;

    let reply = state.executor.execute(&req.text, &session).await;
    Ok(Json(ChatResponse { reply }))
}
