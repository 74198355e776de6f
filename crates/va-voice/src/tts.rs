//! Text-to-speech over the OpenAI speech API

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, VoiceError};

/// TTS API provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TtsProvider {
    OpenAi,
    /// OpenAI-compatible endpoint at this base URL
    Custom(String),
}

/// Audio format for TTS output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// Playable with `aplay`
    #[default]
    Wav,
    Mp3,
    Opus,
    Flac,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Flac => "flac",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// TTS configuration
#[derive(Debug, Clone)]
pub struct TtsConfig {
    pub api_key: String,
    pub provider: TtsProvider,
    pub model: String,
    pub voice: String,
    pub response_format: AudioFormat,
    /// Speech speed (0.25 - 4.0)
    pub speed: Option<f32>,
}

impl TtsConfig {
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            provider: TtsProvider::OpenAi,
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            response_format: AudioFormat::Wav,
            speed: None,
        }
    }

    /// OpenAI TTS keyed by `OPENAI_API_KEY`; `TTS_VOICE` picks the voice
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                VoiceError::ConfigError("Set OPENAI_API_KEY for speech synthesis".to_string())
            })?;

        let config = Self::openai(key);
        Ok(match std::env::var("TTS_VOICE") {
            Ok(voice) if !voice.is_empty() => config.with_voice(voice),
            _ => config,
        })
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed.clamp(0.25, 4.0));
        self
    }

    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.response_format = format;
        self
    }

    pub fn base_url(&self) -> &str {
        match &self.provider {
            TtsProvider::OpenAi => "https://api.openai.com/v1",
            TtsProvider::Custom(url) => url,
        }
    }

    fn request_body(&self, text: &str) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": self.voice,
            "response_format": self.response_format.to_string(),
        });
        if let Some(speed) = self.speed {
            body["speed"] = serde_json::json!(speed);
        }
        body
    }
}

/// Synthesized audio
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub audio_data: Vec<u8>,
    pub format: AudioFormat,
    pub content_type: String,
}

/// TTS client for speech synthesis
pub struct TtsClient {
    client: Client,
    config: TtsConfig,
}

impl TtsClient {
    pub fn new(config: TtsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| VoiceError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn format(&self) -> AudioFormat {
        self.config.response_format
    }

    /// Synthesize speech from text
    pub async fn synthesize(&self, text: &str) -> Result<SynthesisResult> {
        if text.trim().is_empty() {
            return Err(VoiceError::SynthesisFailed("Nothing to say".to_string()));
        }

        let url = format!("{}/audio/speech", self.config.base_url());
        info!("Synthesizing speech: {} chars", text.len());
        debug!("Model: {}, Voice: {}", self.config.model, self.config.voice);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&self.config.request_body(text))
            .send()
            .await
            .map_err(|e| VoiceError::ApiError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VoiceError::SynthesisFailed(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/wav")
            .to_string();

        let audio_data = response.bytes().await.map_err(|e| {
            VoiceError::SynthesisFailed(format!("Failed to read audio data: {}", e))
        })?;

        info!("Synthesis complete: {} bytes", audio_data.len());

        Ok(SynthesisResult {
            audio_data: audio_data.to_vec(),
            format: self.config.response_format,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tts_config_defaults_to_wav() {
        let config = TtsConfig::openai("test-key");
        assert_eq!(config.model, "tts-1");
        assert_eq!(config.response_format, AudioFormat::Wav);
        assert_eq!(config.base_url(), "https://api.openai.com/v1");
    }

    #[test]
    fn test_request_body() {
        let config = TtsConfig::openai("test-key")
            .with_voice("nova")
            .with_speed(9.0)
            .with_format(AudioFormat::Mp3);

        let body = config.request_body("Hello.");
        assert_eq!(body["voice"], "nova");
        assert_eq!(body["response_format"], "mp3");
        assert_eq!(body["speed"], 4.0);
        assert_eq!(body["input"], "Hello.");
    }

    #[tokio::test]
    async fn test_synthesize_rejects_empty_text() {
        let client = TtsClient::new(TtsConfig::openai("test-key")).unwrap();
        let err = client.synthesize("   ").await.unwrap_err();
        assert!(matches!(err, VoiceError::SynthesisFailed(_)));
    }
}
