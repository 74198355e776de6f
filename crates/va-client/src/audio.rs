//! Microphone capture and speaker playback through the ALSA command-line tools

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, bail};
use tokio::process::Command;
use tracing::debug;

/// How to record and play audio
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub record_program: String,
    pub play_program: String,
    /// Length of one utterance recording
    pub record_secs: u32,
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            record_program: "arecord".to_string(),
            play_program: "aplay".to_string(),
            record_secs: 5,
            sample_rate: 16_000,
        }
    }
}

impl AudioConfig {
    /// Defaults overridden by `ARECORD_BIN`, `APLAY_BIN` and `RECORD_SECONDS`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(program) = std::env::var("ARECORD_BIN") {
            config.record_program = program;
        }
        if let Ok(program) = std::env::var("APLAY_BIN") {
            config.play_program = program;
        }
        if let Some(secs) = std::env::var("RECORD_SECONDS").ok().and_then(|s| s.parse().ok()) {
            config.record_secs = secs;
        }
        config
    }

    /// Arguments for a mono 16-bit WAV recording into `path`
    pub fn record_args(&self, path: &Path) -> Vec<String> {
        vec![
            "-q".to_string(),
            "-f".to_string(),
            "S16_LE".to_string(),
            "-c".to_string(),
            "1".to_string(),
            "-r".to_string(),
            self.sample_rate.to_string(),
            "-d".to_string(),
            self.record_secs.to_string(),
            "-t".to_string(),
            "wav".to_string(),
            path.display().to_string(),
        ]
    }
}

async fn run(program: &str, args: &[String]) -> anyhow::Result<()> {
    debug!("Running {} {:?}", program, args);
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
        .with_context(|| format!("Failed to start {}", program))?;

    if !status.success() {
        bail!("{} exited with {}", program, status);
    }
    Ok(())
}

/// Record one utterance from the default microphone into `path`
pub async fn record(config: &AudioConfig, path: &Path) -> anyhow::Result<()> {
    run(&config.record_program, &config.record_args(path)).await
}

/// Play a WAV file on the default output device
pub async fn play(config: &AudioConfig, path: &Path) -> anyhow::Result<()> {
    run(&config.play_program, &["-q".to_string(), path.display().to_string()]).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_args() {
        let config = AudioConfig {
            record_secs: 7,
            ..AudioConfig::default()
        };
        let args = config.record_args(Path::new("/tmp/utterance.wav"));

        assert_eq!(args.last().unwrap(), "/tmp/utterance.wav");
        assert!(args.windows(2).any(|w| w[0] == "-d" && w[1] == "7"));
        assert!(args.windows(2).any(|w| w[0] == "-r" && w[1] == "16000"));
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let config = AudioConfig {
            play_program: "va-client-no-such-player".to_string(),
            ..AudioConfig::default()
        };
        let err = play(&config, Path::new("/tmp/none.wav")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to start"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancelled_run_stops_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("still-running");
        let script = format!("sleep 1; touch {}", marker.display());

        let cancelled = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            run("sh", &["-c".to_string(), script]),
        )
        .await;
        assert!(cancelled.is_err());

        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }
}
