//! va-voice: speech recognition and synthesis for the local voice client
//!
//! - **Speech recognition**: OpenAI or Groq Whisper API
//! - **Text-to-speech**: OpenAI speech API, WAV output by default
//!
//! ```rust,ignore
//! use va_voice::{TtsClient, TtsConfig, WhisperClient, WhisperConfig};
//!
//! let stt = WhisperClient::new(WhisperConfig::from_env()?)?;
//! let heard = stt.transcribe(&std::fs::read("utterance.wav")?, "utterance.wav").await?;
//!
//! let tts = TtsClient::new(TtsConfig::from_env()?)?;
//! let audio = tts.synthesize("Your current balance is 1245 rupees.").await?;
//! std::fs::write("reply.wav", &audio.audio_data)?;
//! ```

pub mod error;
pub mod tts;
pub mod whisper;

pub use error::{Result, VoiceError};
pub use tts::{AudioFormat, SynthesisResult, TtsClient, TtsConfig, TtsProvider};
pub use whisper::{TranscriptionResult, WhisperClient, WhisperConfig, WhisperProvider};
