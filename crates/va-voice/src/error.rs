//! Error types for va-voice

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Speech recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Audio encoding error: {0}")]
    EncodingError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VoiceError>;
