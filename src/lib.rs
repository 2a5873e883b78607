//! ytsearch-mcp library
//!
//! YouTube search, metadata and downloads over yt-dlp, exposed as tools of a
//! Model Context Protocol server.

pub mod app;
pub mod backend;
pub mod downloader;
pub mod extractor;
pub mod formatters;
pub mod models;
pub mod search;
pub mod server;
pub mod utils;

// Re-export main types for easier use
pub use backend::Services;
pub use downloader::{Downloader, YtDlpDownloader};
pub use extractor::{MediaBackend, YtDlpCli};
pub use formatters::{OutputFormat, ResultFormatter};
pub use search::{SearchProvider, YtDlpSearchProvider};
pub use server::McpServer;
pub use utils::{ServerSettings, YtSearchError};
