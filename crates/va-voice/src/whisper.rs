//! Speech recognition over the Whisper transcription API
//!
//! Providers:
//! - OpenAI Whisper API
//! - Groq Whisper API
//! - Any OpenAI-compatible endpoint

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, VoiceError};

/// Whisper API provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhisperProvider {
    OpenAi,
    Groq,
    /// OpenAI-compatible endpoint at this base URL
    Custom(String),
}

/// Configuration for the Whisper client
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    pub api_key: String,
    pub provider: WhisperProvider,
    /// Model to use (e.g., "whisper-1", "whisper-large-v3")
    pub model: String,
    /// Language hint (ISO 639-1 code, e.g., "en")
    pub language: Option<String>,
    /// Prompt to guide transcription
    pub prompt: Option<String>,
}

impl WhisperConfig {
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            provider: WhisperProvider::OpenAi,
            model: "whisper-1".to_string(),
            language: None,
            prompt: None,
        }
    }

    pub fn groq(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            provider: WhisperProvider::Groq,
            model: "whisper-large-v3".to_string(),
            language: None,
            prompt: None,
        }
    }

    /// Pick a provider from `GROQ_API_KEY` or `OPENAI_API_KEY`, in that order
    pub fn from_env() -> Result<Self> {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let config = if let Some(key) = non_empty("GROQ_API_KEY") {
            Self::groq(key)
        } else if let Some(key) = non_empty("OPENAI_API_KEY") {
            Self::openai(key)
        } else {
            return Err(VoiceError::ConfigError(
                "Set GROQ_API_KEY or OPENAI_API_KEY for speech recognition".to_string(),
            ));
        };

        let config = match non_empty("STT_LANGUAGE") {
            Some(lang) => config.with_language(lang),
            None => config.with_language("en"),
        };

        // Optional vocabulary hint sent with every upload
        Ok(match non_empty("STT_PROMPT") {
            Some(prompt) => config.with_prompt(prompt),
            None => config,
        })
    }

    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.language = Some(lang.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// API base URL for the provider
    pub fn base_url(&self) -> &str {
        match &self.provider {
            WhisperProvider::OpenAi => "https://api.openai.com/v1",
            WhisperProvider::Groq => "https://api.groq.com/openai/v1",
            WhisperProvider::Custom(url) => url,
        }
    }
}

/// Transcription result
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
    /// Detected language, when the API reports it
    #[serde(default)]
    pub language: Option<String>,
    /// Audio duration in seconds, when the API reports it
    #[serde(default)]
    pub duration: Option<f64>,
}

impl TranscriptionResult {
    /// Transcribed text, or `None` when nothing was said
    pub fn speech(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// MIME type for an audio file name
fn mime_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "wav" => "audio/wav",
        "ogg" | "opus" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "webm" => "audio/webm",
        _ => "audio/mpeg",
    }
}

/// Whisper client for speech recognition
pub struct WhisperClient {
    client: Client,
    config: WhisperConfig,
}

impl WhisperClient {
    pub fn new(config: WhisperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| VoiceError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Transcribe audio bytes; the file name decides the MIME type
    pub async fn transcribe(&self, audio_data: &[u8], filename: &str) -> Result<TranscriptionResult> {
        let url = format!("{}/audio/transcriptions", self.config.base_url());

        info!("Transcribing audio: {} bytes, filename: {}", audio_data.len(), filename);
        debug!("Using model: {}, provider: {:?}", self.config.model, self.config.provider);

        let part = reqwest::multipart::Part::bytes(audio_data.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime_for(filename))
            .map_err(|e| VoiceError::EncodingError(format!("Failed to set mime type: {}", e)))?;

        let mut form = reqwest::multipart::Form::new()
            .text("model", self.config.model.clone())
            .text("response_format", "json")
            .part("file", part);

        if let Some(ref lang) = self.config.language {
            form = form.text("language", lang.clone());
        }
        if let Some(ref prompt) = self.config.prompt {
            form = form.text("prompt", prompt.clone());
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| VoiceError::ApiError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VoiceError::RecognitionFailed(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        let result: TranscriptionResult = response.json().await.map_err(|e| {
            VoiceError::RecognitionFailed(format!("Failed to parse response: {}", e))
        })?;

        info!("Transcription complete: {} characters", result.text.len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_config_providers() {
        let config = WhisperConfig::openai("test-key");
        assert_eq!(config.model, "whisper-1");
        assert_eq!(config.base_url(), "https://api.openai.com/v1");

        let config = WhisperConfig::groq("test-key")
            .with_language("en")
            .with_prompt("broadband, postpaid, rupees");
        assert_eq!(config.model, "whisper-large-v3");
        assert_eq!(config.base_url(), "https://api.groq.com/openai/v1");
        assert_eq!(config.language.as_deref(), Some("en"));
        assert_eq!(config.prompt.as_deref(), Some("broadband, postpaid, rupees"));

        let config = WhisperConfig {
            provider: WhisperProvider::Custom("http://localhost:9000/v1".to_string()),
            ..WhisperConfig::openai("k")
        };
        assert_eq!(config.base_url(), "http://localhost:9000/v1");
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("utterance.wav"), "audio/wav");
        assert_eq!(mime_for("clip.OGG"), "audio/ogg");
        assert_eq!(mime_for("recording"), "audio/mpeg");
    }

    #[test]
    fn test_speech_ignores_silence() {
        let result: TranscriptionResult = serde_json::from_str(r#"{"text": "  "}"#).unwrap();
        assert_eq!(result.speech(), None);

        let result: TranscriptionResult =
            serde_json::from_str(r#"{"text": " What's my balance? ", "language": "en"}"#).unwrap();
        assert_eq!(result.speech(), Some("What's my balance?"));
    }
}
