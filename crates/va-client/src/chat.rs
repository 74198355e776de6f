//! Client for the server's local chat endpoint

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000/local/chat";
pub const DEFAULT_USER_ID: &str = "local_tester_01";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    text: &'a str,
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    reply: String,
}

#[derive(Debug, Error)]
pub enum ChatError {
    /// The server answered with a non-success status
    #[error("Server Error: {status} - {body}")]
    Server { status: u16, body: String },

    #[error("Network Error: {0}")]
    Network(#[from] reqwest::Error),
}

pub struct ChatClient {
    client: Client,
    url: String,
    user_id: String,
}

impl ChatClient {
    pub fn new(url: impl Into<String>, user_id: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            user_id: user_id.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one utterance and return the spoken reply
    pub async fn ask(&self, text: &str) -> Result<String, ChatError> {
        let response = self
            .client
            .post(&self.url)
            .json(&ChatRequest {
                text,
                user_id: &self.user_id,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let data: ChatResponse = response.json().await?;
        Ok(data.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/local/chat", addr)
    }

    #[tokio::test]
    async fn test_ask_returns_reply() {
        let app = Router::new().route(
            "/local/chat",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["user_id"], DEFAULT_USER_ID);
                Json(serde_json::json!({"reply": format!("echo: {}", body["text"].as_str().unwrap())}))
            }),
        );
        let url = serve(app).await;

        let client = ChatClient::new(url, DEFAULT_USER_ID).unwrap();
        assert_eq!(client.ask("hello").await.unwrap(), "echo: hello");
    }

    #[tokio::test]
    async fn test_ask_reports_server_error() {
        let app = Router::new().route(
            "/local/chat",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"detail": "disk full"})),
                )
            }),
        );
        let url = serve(app).await;

        let client = ChatClient::new(url, DEFAULT_USER_ID).unwrap();
        let err = client.ask("hello").await.unwrap_err();
        assert!(matches!(err, ChatError::Server { status: 500, ref body } if body.contains("disk full")));
        assert!(err.to_string().starts_with("Server Error: 500"));
    }

    #[tokio::test]
    async fn test_ask_reports_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ChatClient::new(format!("http://{}/local/chat", addr), DEFAULT_USER_ID).unwrap();
        let err = client.ask("hello").await.unwrap_err();
        assert!(matches!(err, ChatError::Network(_)));
        assert!(err.to_string().starts_with("Network Error: "));
    }
}
