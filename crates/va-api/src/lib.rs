//! va-api: HTTP surface of the voice desk
//!
//! Twilio voice webhook (TwiML), local JSON chat and a health check,
//! built with axum.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod twiml;
pub mod voice;

pub use error::{ApiError, Result};
pub use server::{AppState, app, shutdown_signal, start_server};
