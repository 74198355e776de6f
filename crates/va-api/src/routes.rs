//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::{health, local_chat};
use crate::server::AppState;
use crate::voice::{process_agent, voice};

/// Create the API router
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Twilio webhook
        .route("/voice", get(voice).post(voice))
        .route("/process_agent", get(process_agent).post(process_agent))
        // Local microphone client
        .route("/local/chat", post(local_chat))
}
