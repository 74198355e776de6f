//! Twilio voice webhook
//!
//! ```text
//! caller speaks ──► /voice ──(ack + redirect)──► /process_agent
//!      ▲              │ silence                       │ reply
//!      └── Gather ◄───┴───────────────────────────────┘
//! ```

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use serde::Deserialize;
use tracing::{info, warn};

use va_core::config::TelephonyConfig;

use crate::error::{ApiError, Result};
use crate::server::AppState;
use crate::twiml::{Gather, VoiceResponse};

pub const ACKNOWLEDGE: &str = "Got it. Kindly wait while I process your request.";
pub const STILL_THERE: &str = "I didn't hear anything. Are you still there?";
pub const GREETING: &str = "Hello. How can I help you today?";
pub const MISSED_THAT: &str = "Sorry, I missed that.";
pub const LOST_CONNECTION: &str = "Sorry, I lost the connection.";

const ANONYMOUS: &str = "anonymous";

/// Fields Twilio sends to the gather action
#[derive(Debug, Default, Deserialize)]
pub struct VoiceParams {
    #[serde(rename = "SpeechResult")]
    pub speech_result: Option<String>,
    #[serde(rename = "From")]
    pub from: Option<String>,
}

/// Query of the redirect to `/process_agent`
#[derive(Debug, Default, Deserialize)]
pub struct ProcessParams {
    #[serde(rename = "UserText")]
    pub user_text: Option<String>,
    #[serde(rename = "From")]
    pub from: Option<String>,
}

fn caller(from: Option<String>) -> String {
    from.filter(|f| !f.is_empty())
        .unwrap_or_else(|| ANONYMOUS.to_string())
}

fn listen(telephony: &TelephonyConfig) -> Gather {
    Gather::speech("/voice", telephony.language.clone(), telephony.gather_timeout_secs)
}

fn process_url(user_text: &str, from: &str) -> Result<String> {
    let query = serde_urlencoded::to_string([("UserText", user_text), ("From", from)])
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    Ok(format!("/process_agent?{}", query))
}

/// `GET|POST /voice`
pub async fn voice(
    State(state): State<AppState>,
    form: std::result::Result<Form<VoiceParams>, FormRejection>,
) -> Result<VoiceResponse> {
    let params = match form {
        Ok(Form(params)) => params,
        Err(e) => {
            warn!("Unreadable voice webhook form: {}", e);
            VoiceParams::default()
        }
    };
    let from = caller(params.from);

    if let Some(user_text) = params.speech_result.filter(|t| !t.is_empty()) {
        info!("User said: {}", user_text);
        return Ok(VoiceResponse::new()
            .say(ACKNOWLEDGE)
            .redirect(process_url(&user_text, &from)?));
    }

    let prompt = if state.sessions.exists(&from).await {
        info!("Silence detected for existing session: {}", from);
        STILL_THERE
    } else {
        info!("New call from: {}", from);
        GREETING
    };

    Ok(VoiceResponse::new()
        .say(prompt)
        .gather(listen(&state.config.telephony)))
}

/// `GET|POST /process_agent`
pub async fn process_agent(
    State(state): State<AppState>,
    query: std::result::Result<Query<ProcessParams>, QueryRejection>,
) -> Result<VoiceResponse> {
    let Query(params) = query.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let Some(user_text) = params.user_text.filter(|t| !t.is_empty()) else {
        return Ok(VoiceResponse::new().say(LOST_CONNECTION));
    };
    let from = caller(params.from);

    let session = state.sessions.get_or_create(&from).await?;
    let reply = state.executor.execute(&user_text, &session).await;
    let spoken = if reply.is_empty() { MISSED_THAT } else { reply.as_str() };

    Ok(VoiceResponse::new().gather(listen(&state.config.telephony).say(spoken)))
}
