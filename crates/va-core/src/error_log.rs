//! Diagnostic error log
//!
//! Each failure overwrites the file, so it holds only the most recent one.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{error, warn};

/// File that receives the last agent failure
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Log `err` and replace the file contents with its report
    pub async fn record(&self, stage: &str, err: &(dyn std::error::Error + Send + Sync + 'static)) {
        error!("{} failed: {}", stage, err);

        let report = Self::format_report(stage, err);
        if let Err(e) = tokio::fs::write(&self.path, report).await {
            warn!("Failed to write error log {}: {}", self.path.display(), e);
        }
    }

    fn format_report(stage: &str, err: &(dyn std::error::Error + 'static)) -> String {
        let mut report = format!("[{}] {} failed\n{}\n", Utc::now().to_rfc3339(), stage, err);
        let mut source = err.source();
        while let Some(cause) = source {
            report.push_str(&format!("caused by: {}\n", cause));
            source = cause.source();
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_record_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("error.log"));

        log.record("Root agent", &Error::Runtime("first".to_string()))
            .await;
        log.record("Selected agent", &Error::Runtime("second".to_string()))
            .await;

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert!(contents.contains("Selected agent failed"));
        assert!(contents.contains("second"));
        assert!(!contents.contains("first"));
    }

    #[tokio::test]
    async fn test_unwritable_path_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("missing").join("error.log"));

        log.record("Root agent", &Error::Other("boom".to_string()))
            .await;
        assert!(!log.path().exists());
    }
}
