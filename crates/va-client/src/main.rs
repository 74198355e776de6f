//! va-client: talk to the voice desk from a local microphone
//!
//! Each round records an utterance, transcribes it, posts the text to the
//! server's `/local/chat` endpoint and speaks the reply. Ctrl+C exits.

mod audio;
mod chat;

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use va_voice::{TtsClient, TtsConfig, WhisperClient, WhisperConfig};

use audio::AudioConfig;
use chat::{ChatClient, DEFAULT_SERVER_URL, DEFAULT_USER_ID};

const SILENCE_BACKOFF: Duration = Duration::from_secs(1);

struct VoiceClient {
    audio: AudioConfig,
    stt: WhisperClient,
    tts: TtsClient,
    chat: ChatClient,
}

impl VoiceClient {
    /// Record and transcribe; `None` when nothing was heard
    async fn listen(&self) -> anyhow::Result<Option<String>> {
        let file = tempfile::Builder::new()
            .prefix("va-utterance-")
            .suffix(".wav")
            .tempfile()?;

        println!("Listening... (Speak now)");
        audio::record(&self.audio, file.path()).await?;

        let wav = tokio::fs::read(file.path()).await?;
        println!("Recognizing...");
        let result = self.stt.transcribe(&wav, "utterance.wav").await?;
        Ok(result.speech().map(str::to_string))
    }

    async fn speak(&self, text: &str) -> anyhow::Result<()> {
        let speech = self.tts.synthesize(text).await?;
        let file = tempfile::Builder::new()
            .prefix("va-reply-")
            .suffix(&format!(".{}", speech.format.extension()))
            .tempfile()?;

        tokio::fs::write(file.path(), &speech.audio_data).await?;
        audio::play(&self.audio, file.path()).await
    }

    async fn round(&self) {
        let user_text = match self.listen().await {
            Ok(Some(text)) => text,
            Ok(None) => {
                println!("No speech detected.");
                tokio::time::sleep(SILENCE_BACKOFF).await;
                return;
            }
            Err(e) => {
                tracing::debug!("Listening failed: {:#}", e);
                println!("No speech detected.");
                tokio::time::sleep(SILENCE_BACKOFF).await;
                return;
            }
        };

        println!("You said: {}", user_text);
        match self.chat.ask(&user_text).await {
            Ok(reply) => {
                println!("Agent: {}", reply);
                if let Err(e) = self.speak(&reply).await {
                    println!("Playback Error: {:#}", e);
                }
            }
            Err(e) => println!("{}", e),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    dotenvy::dotenv().ok();

    let url = std::env::var("VOICE_DESK_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    let user_id = std::env::var("VOICE_DESK_USER").unwrap_or_else(|_| DEFAULT_USER_ID.to_string());

    let client = VoiceClient {
        audio: AudioConfig::from_env(),
        stt: WhisperClient::new(WhisperConfig::from_env()?)?,
        tts: TtsClient::new(TtsConfig::from_env()?)?,
        chat: ChatClient::new(url, user_id)?,
    };

    println!("--- Local Voice Agent Client ---");
    println!("Connecting to {}", client.chat.url());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("\nExiting...");
                break;
            }
            _ = client.round() => {}
        }
    }

    Ok(())
}
