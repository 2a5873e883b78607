//! Rendering of search results, details and download outcomes

pub mod json;
pub mod markdown;

use crate::models::{DownloadResult, FormatSummary, Playlist, PlaylistDetails, Video, VideoDetails};
use crate::utils::error::Result;
use std::fmt;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;

/// Renders the typed models as text for MCP clients
pub trait ResultFormatter: Send + Sync {
    fn format_videos(&self, videos: &[Video]) -> Result<String>;

    fn format_video_details(&self, details: &VideoDetails) -> Result<String>;

    fn format_playlists(&self, playlists: &[Playlist]) -> Result<String>;

    fn format_playlist_details(&self, details: &PlaylistDetails) -> Result<String>;

    fn format_download_result(&self, result: &DownloadResult) -> Result<String>;

    fn format_formats(&self, summary: &FormatSummary) -> Result<String>;
}

/// Output format requested by a tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

impl OutputFormat {
    /// Parse a format name; anything unrecognized is JSON.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "markdown" | "md" => OutputFormat::Markdown,
            _ => OutputFormat::Json,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("markdown"), OutputFormat::Markdown);
        assert_eq!(OutputFormat::parse("Markdown "), OutputFormat::Markdown);
        assert_eq!(OutputFormat::parse("md"), OutputFormat::Markdown);
        assert_eq!(OutputFormat::parse("xml"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse(""), OutputFormat::Json);
    }

    #[test]
    fn test_display() {
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
        assert_eq!(OutputFormat::default().to_string(), "json");
    }
}
