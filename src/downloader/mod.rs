//! Downloads through yt-dlp

pub mod engine;
pub mod presets;
pub mod progress;

pub use engine::{Downloader, YtDlpDownloader};
pub use progress::{DownloadProgress, DownloadStatus, ProgressEvent, ProgressTracker};
