//! LLM API HTTP Client
//!
//! Supports both the Claude Messages API and OpenAI-compatible APIs.

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::{LlmConfig, LlmProvider};
use crate::error::{Error, Result};

use super::types::*;

/// LLM API client (Claude or OpenAI-compatible)
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    max_tokens: u64,
    base_url: String,
    provider: LlmProvider,
}

impl LlmClient {
    /// Create a new LLM client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(Error::Http)?;

        let base_url = match &config.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => match config.provider {
                LlmProvider::Claude => "https://api.anthropic.com/v1".to_string(),
                LlmProvider::OpenAi => "https://api.openai.com/v1".to_string(),
            },
        };

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            max_tokens: config.max_tokens,
            base_url,
            provider: config.provider.clone(),
        })
    }

    /// Send a message to the LLM API
    pub async fn messages(&self, request: MessagesRequest) -> Result<MessagesResponse> {
        if self.api_key.is_empty() {
            return Err(Error::Config("LLM_API_KEY not set".to_string()));
        }

        match self.provider {
            LlmProvider::Claude => self.send_claude_request(request).await,
            LlmProvider::OpenAi => self.send_openai_request(request).await,
        }
    }

    async fn send_claude_request(&self, request: MessagesRequest) -> Result<MessagesResponse> {
        let url = format!("{}/messages", self.base_url);

        debug!("Sending request to Claude API: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Claude API error: {} - {}", status, body);
            return Err(Error::LlmApi(format!("{}: {}", status, body)));
        }

        let parsed: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
            Error::LlmApi(format!("Failed to parse response: {} - {}", e, body))
        })?;

        info!(
            "Claude API response: stop_reason={}, tokens={}",
            parsed.stop_reason,
            parsed.usage.as_ref().map(|u| u.output_tokens).unwrap_or(0)
        );

        Ok(parsed)
    }

    async fn send_openai_request(&self, request: MessagesRequest) -> Result<MessagesResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!("Sending request to OpenAI-compatible API: {}", url);

        let openai_request = ChatCompletionRequest::from_claude_request(&request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&openai_request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("OpenAI API error: {} - {}", status, body);
            return Err(Error::LlmApi(format!("{}: {}", status, body)));
        }

        let openai_response: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            Error::LlmApi(format!("Failed to parse response: {} - {}", e, body))
        })?;

        let parsed = openai_response.to_claude_response();

        info!(
            "OpenAI API response: stop_reason={}, tokens={}",
            parsed.stop_reason,
            parsed.usage.as_ref().map(|u| u.output_tokens).unwrap_or(0)
        );

        Ok(parsed)
    }

    pub fn max_tokens(&self) -> u64 {
        self.max_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_urls() {
        let claude = LlmClient::new(&LlmConfig::default()).unwrap();
        assert_eq!(claude.base_url, "https://api.anthropic.com/v1");

        let openai = LlmClient::new(&LlmConfig {
            provider: LlmProvider::OpenAi,
            base_url: Some("https://generativelanguage.googleapis.com/v1beta/openai/".to_string()),
            ..LlmConfig::default()
        })
        .unwrap();
        assert_eq!(
            openai.base_url,
            "https://generativelanguage.googleapis.com/v1beta/openai"
        );
        assert_eq!(openai.provider, LlmProvider::OpenAi);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_fast() {
        let client = LlmClient::new(&LlmConfig::default()).unwrap();
        let request = MessagesRequestBuilder::new("test-model").user("hello").build();

        let result = client.messages(request).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
