//! Error handling for ytsearch-mcp

use thiserror::Error;

/// Main error type for ytsearch-mcp
#[derive(Debug, Error)]
pub enum YtSearchError {
    #[error("Search provider error: {0}")]
    SearchProvider(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid parameter: {0}")]
    Validation(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Insufficient disk space: {0}")]
    DiskSpace(String),

    #[error("FFmpeg not found. {0}")]
    FfmpegNotFound(String),

    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl YtSearchError {
    /// Stable machine-readable name, reported to MCP clients as `error_type`.
    pub fn kind(&self) -> &'static str {
        match self {
            YtSearchError::SearchProvider(_) => "search_provider_error",
            YtSearchError::VideoNotFound(_) => "video_not_found",
            YtSearchError::Network(_) => "network_error",
            YtSearchError::InvalidQuery(_) => "invalid_query",
            YtSearchError::Validation(_) => "validation_error",
            YtSearchError::Download(_) => "download_error",
            YtSearchError::DiskSpace(_) => "disk_space_error",
            YtSearchError::FfmpegNotFound(_) => "ffmpeg_not_found",
            YtSearchError::YtDlpNotFound => "ytdlp_not_found",
            YtSearchError::Config(_) => "config_error",
            YtSearchError::Io(_) => "io_error",
            YtSearchError::Serialization(_) => "serialization_error",
        }
    }

    /// Whether the failure is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, YtSearchError::Network(_))
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, YtSearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(YtSearchError::Network("x".into()).kind(), "network_error");
        assert_eq!(
            YtSearchError::VideoNotFound("abc".into()).kind(),
            "video_not_found"
        );
        assert_eq!(YtSearchError::YtDlpNotFound.kind(), "ytdlp_not_found");
    }

    #[test]
    fn test_only_network_errors_are_retryable() {
        assert!(YtSearchError::Network("timeout".into()).is_retryable());
        assert!(!YtSearchError::SearchProvider("boom".into()).is_retryable());
        assert!(!YtSearchError::DiskSpace("full".into()).is_retryable());
    }

    #[test]
    fn test_display_includes_message() {
        let err = YtSearchError::InvalidQuery("Query cannot be empty".into());
        assert_eq!(err.to_string(), "Invalid query: Query cannot be empty");
    }
}
