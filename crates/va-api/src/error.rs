//! Error types for va-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Body returned for any webhook fault
pub const INTERNAL_ERROR: &str = "Internal Error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("TwiML rendering failed: {0}")]
    Twiml(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Core error: {0}")]
    Core(#[from] va_core::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Callers only ever see a plain "Internal Error" with status 500
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Webhook failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR).into_response()
    }
}
