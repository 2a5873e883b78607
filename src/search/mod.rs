//! Video and playlist search over yt-dlp

pub mod classify;
pub mod parsers;
pub mod provider;
pub mod retry;

pub use classify::{is_network_error, is_video_unavailable};
pub use provider::{SearchProvider, YtDlpSearchProvider};
pub use retry::{retry_async, RetryPolicy};
