use crate::downloader::progress::ProgressTracker;
use crate::extractor::options::YtDlpOptions;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Why a backend call produced no info dictionary
#[derive(Debug, Error)]
pub enum BackendFailure {
    #[error("yt-dlp executable not found")]
    NotInstalled,

    #[error("failed to start yt-dlp: {0}")]
    Spawn(#[source] std::io::Error),

    /// Non-zero exit; `message` holds yt-dlp's error text
    #[error("{message}")]
    Failed { message: String },

    #[error("yt-dlp timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("invalid yt-dlp output: {0}")]
    InvalidOutput(String),
}

/// Core trait for media extraction backends
///
/// Isolates the search provider and downloader from the way yt-dlp is run,
/// so both can be driven by a scripted backend in tests.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Returns a unique identifier for this backend
    fn id(&self) -> &'static str;

    /// Run one extraction against `target` (a URL or `ytsearchN:` query) and
    /// return the info dictionary.
    ///
    /// Downloads report progress lines to `progress` when given.
    async fn extract(
        &self,
        target: &str,
        options: &YtDlpOptions,
        progress: Option<&ProgressTracker>,
    ) -> Result<Value, BackendFailure>;
}
