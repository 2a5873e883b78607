//! Pretty-printed JSON output

use crate::formatters::ResultFormatter;
use crate::models::{DownloadResult, FormatSummary, Playlist, PlaylistDetails, Video, VideoDetails};
use crate::utils::error::Result;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

impl ResultFormatter for JsonFormatter {
    fn format_videos(&self, videos: &[Video]) -> Result<String> {
        pretty(&json!({
            "count": videos.len(),
            "videos": videos,
        }))
    }

    fn format_video_details(&self, details: &VideoDetails) -> Result<String> {
        pretty(details)
    }

    fn format_playlists(&self, playlists: &[Playlist]) -> Result<String> {
        pretty(&json!({
            "count": playlists.len(),
            "playlists": playlists,
        }))
    }

    fn format_playlist_details(&self, details: &PlaylistDetails) -> Result<String> {
        pretty(details)
    }

    fn format_download_result(&self, result: &DownloadResult) -> Result<String> {
        pretty(result)
    }

    fn format_formats(&self, summary: &FormatSummary) -> Result<String> {
        pretty(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample_video() -> Video {
        let mut video = Video::new("dQw4w9WgXcQ", "Rick Astley - Never Gonna Give You Up");
        video.duration = Some(212);
        video.view_count = Some(1_400_000_000);
        video.uploader = Some("Rick Astley".to_string());
        video.upload_date = Some("20091025".to_string());
        video
    }

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_format_videos() {
        let second = Video::new("abc123XYZ00", "Second Video");
        let output = JsonFormatter.format_videos(&[sample_video(), second]).unwrap();
        let data = parse(&output);

        assert_eq!(data["count"], 2);
        assert_eq!(data["videos"][0]["video_id"], "dQw4w9WgXcQ");
        assert_eq!(data["videos"][0]["title"], "Rick Astley - Never Gonna Give You Up");
        assert_eq!(data["videos"][1]["url"], "https://youtube.com/watch?v=abc123XYZ00");
    }

    #[test]
    fn test_empty_list() {
        let data = parse(&JsonFormatter.format_videos(&[]).unwrap());
        assert_eq!(data["count"], 0);
        assert_eq!(data["videos"], Value::Array(vec![]));

        let data = parse(&JsonFormatter.format_playlists(&[]).unwrap());
        assert_eq!(data["count"], 0);
        assert_eq!(data["playlists"], Value::Array(vec![]));
    }

    #[test]
    fn test_absent_fields_are_null() {
        let output = JsonFormatter
            .format_videos(&[Video::new("minimal001", "Minimal Video")])
            .unwrap();
        let data = parse(&output);

        assert!(data["videos"][0]["duration"].is_null());
        assert!(data["videos"][0]["view_count"].is_null());
        assert!(data["videos"][0]["uploader"].is_null());
    }

    #[test]
    fn test_unicode_kept_verbatim_and_indented() {
        let output = JsonFormatter
            .format_videos(&[Video::new("korean12345", "한글 제목 테스트")])
            .unwrap();

        assert!(output.contains("한글 제목 테스트"));
        assert!(output.contains("\n  "));
    }

    #[test]
    fn test_video_details_are_flat() {
        let mut details = VideoDetails::new(sample_video());
        details.description = Some("The official video".to_string());
        details.tags = vec!["rick astley".to_string()];
        details.like_count = Some(15_000_000);
        details.formats_available = 25;

        let data = parse(&JsonFormatter.format_video_details(&details).unwrap());
        assert_eq!(data["video_id"], "dQw4w9WgXcQ");
        assert_eq!(data["description"], "The official video");
        assert_eq!(data["tags"][0], "rick astley");
        assert_eq!(data["like_count"], 15_000_000);
        assert_eq!(data["formats_available"], 25);
        assert!(data.get("video").is_none());

        let minimal = parse(
            &JsonFormatter
                .format_video_details(&VideoDetails::new(Video::new("minimal001", "M")))
                .unwrap(),
        );
        assert_eq!(minimal["tags"], Value::Array(vec![]));
        assert_eq!(minimal["categories"], Value::Array(vec![]));
    }

    #[test]
    fn test_playlist_details() {
        let mut details = PlaylistDetails::new(Playlist::new("PLminimal", "Minimal"));
        let data = parse(&JsonFormatter.format_playlist_details(&details).unwrap());
        assert_eq!(data["playlist_id"], "PLminimal");
        assert!(data["availability"].is_null());
        assert_eq!(data["tags"], Value::Array(vec![]));

        details.availability = Some("public".to_string());
        details.view_count = Some(100_000);
        let data = parse(&JsonFormatter.format_playlist_details(&details).unwrap());
        assert_eq!(data["availability"], "public");
        assert_eq!(data["view_count"], 100_000);
    }

    #[test]
    fn test_download_result() {
        let result = DownloadResult::failure("dQw4w9WgXcQ", "mp4", "best", "Video unavailable");
        let data = parse(&JsonFormatter.format_download_result(&result).unwrap());
        assert_eq!(data["success"], false);
        assert_eq!(data["error"], "Video unavailable");
        assert!(data["file_path"].is_null());
    }
}
