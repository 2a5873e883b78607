//! yt-dlp extraction backend

pub mod options;
pub mod traits;
pub mod ytdlp;

pub use options::{AudioExtraction, YtDlpOptions};
pub use traits::{BackendFailure, MediaBackend};
pub use ytdlp::YtDlpCli;
