//! Human-readable Markdown output

use crate::formatters::ResultFormatter;
use crate::models::{DownloadResult, FormatSummary, Playlist, PlaylistDetails, Video, VideoDetails};
use crate::utils::error::Result;
use std::fmt::Write;

const DESCRIPTION_LIMIT: usize = 500;
const LIST_DESCRIPTION_LIMIT: usize = 150;
const TAG_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }
}

/// `1h 2m 3s`, or `3m 32s` under an hour
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else {
        format!("{}m {}s", minutes, secs)
    }
}

/// Thousands separators: `1400000000` → `1,400,000,000`
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `YYYYMMDD` → `YYYY-MM-DD`; anything else is returned unchanged
pub fn format_date(date: &str) -> String {
    if date.len() == 8 && date.chars().all(|c| c.is_ascii_digit()) {
        format!("{}-{}-{}", &date[..4], &date[4..6], &date[6..])
    } else {
        date.to_string()
    }
}

/// Human-readable byte size
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = "B";
    for next in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{:.1} {}", value, unit)
}

/// Cut `text` to `limit` characters, marking the cut with `...`
fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let cut: String = text.chars().take(limit).collect();
        format!("{}...", cut)
    }
}

fn age_restriction(age_limit: Option<u32>) -> String {
    match age_limit {
        Some(age) if age > 0 => format!("{}+", age),
        _ => "No age restriction".to_string(),
    }
}

fn push_tags(out: &mut String, tags: &[String]) {
    if tags.is_empty() {
        return;
    }
    out.push_str("## Tags\n\n");
    let shown: Vec<String> = tags.iter().take(TAG_LIMIT).map(|t| format!("`{}`", t)).collect();
    out.push_str(&shown.join(", "));
    out.push('\n');
    if tags.len() > TAG_LIMIT {
        let _ = writeln!(out, "\n...and {} more tags", tags.len() - TAG_LIMIT);
    }
    out.push('\n');
}

fn push_description(out: &mut String, description: Option<&str>) {
    if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(out, "## Description\n\n{}\n", truncate(description, DESCRIPTION_LIMIT));
    }
}

fn push_video_summary(out: &mut String, index: usize, video: &Video) {
    let _ = writeln!(out, "## {}. {}\n", index, video.title);
    let _ = writeln!(out, "- **Video ID**: `{}`", video.video_id);
    let _ = writeln!(out, "- **URL**: {}", video.url);
    if let Some(duration) = video.duration {
        let _ = writeln!(out, "- **Duration**: {}", format_duration(duration));
    }
    if let Some(views) = video.view_count {
        let _ = writeln!(out, "- **Views**: {}", format_number(views));
    }
    if let Some(uploader) = &video.uploader {
        let _ = writeln!(out, "- **Uploader**: {}", uploader);
    }
    if let Some(date) = &video.upload_date {
        let _ = writeln!(out, "- **Upload Date**: {}", format_date(date));
    }
    out.push('\n');
}

impl ResultFormatter for MarkdownFormatter {
    fn format_videos(&self, videos: &[Video]) -> Result<String> {
        let mut out = format!("# Search Results ({} videos)\n\n", videos.len());
        for (i, video) in videos.iter().enumerate() {
            push_video_summary(&mut out, i + 1, video);
        }
        Ok(out)
    }

    fn format_video_details(&self, details: &VideoDetails) -> Result<String> {
        let mut out = format!("# {}\n\n## Basic Information\n\n", details.title);
        let _ = writeln!(out, "- **Video ID**: `{}`", details.video_id);
        let _ = writeln!(out, "- **URL**: {}", details.url);
        if let Some(duration) = details.duration {
            let _ = writeln!(out, "- **Duration**: {}", format_duration(duration));
        }
        if let Some(uploader) = &details.uploader {
            let _ = writeln!(out, "- **Uploader**: {}", uploader);
        }
        if let Some(channel) = &details.uploader_id {
            let _ = writeln!(out, "- **Channel ID**: `{}`", channel);
        }
        if let Some(date) = &details.upload_date {
            let _ = writeln!(out, "- **Upload Date**: {}", format_date(date));
        }
        let _ = writeln!(out, "- **Age Restriction**: {}", age_restriction(details.age_limit));
        if details.formats_available > 0 {
            let _ = writeln!(out, "- **Available Formats**: {}", details.formats_available);
        }
        if let Some(thumbnail) = &details.thumbnail {
            let _ = writeln!(out, "- **Thumbnail**: {}", thumbnail);
        }
        out.push('\n');

        let stats = [
            ("Views", details.view_count),
            ("Likes", details.like_count),
            ("Comments", details.comment_count),
        ];
        if stats.iter().any(|(_, value)| value.is_some()) {
            out.push_str("## Statistics\n\n");
            for (label, value) in stats {
                if let Some(value) = value {
                    let _ = writeln!(out, "- **{}**: {}", label, format_number(value));
                }
            }
            out.push('\n');
        }

        push_description(&mut out, details.description.as_deref());
        push_tags(&mut out, &details.tags);

        if !details.categories.is_empty() {
            let _ = writeln!(out, "## Categories\n\n{}\n", details.categories.join(", "));
        }

        Ok(out)
    }

    fn format_playlists(&self, playlists: &[Playlist]) -> Result<String> {
        let mut out = format!("# Playlist Search Results ({} playlists)\n\n", playlists.len());
        for (i, playlist) in playlists.iter().enumerate() {
            let _ = writeln!(out, "## {}. {}\n", i + 1, playlist.title);
            let _ = writeln!(out, "- **Playlist ID**: `{}`", playlist.playlist_id);
            let _ = writeln!(out, "- **URL**: {}", playlist.url);
            if let Some(uploader) = &playlist.uploader {
                let _ = writeln!(out, "- **Creator**: {}", uploader);
            }
            if let Some(count) = playlist.video_count {
                let _ = writeln!(out, "- **Videos**: {}", format_number(count));
            }
            if let Some(description) = playlist.description.as_deref().filter(|d| !d.trim().is_empty()) {
                let _ = writeln!(
                    out,
                    "- **Description**: {}",
                    truncate(description, LIST_DESCRIPTION_LIMIT)
                );
            }
            out.push('\n');
        }
        Ok(out)
    }

    fn format_playlist_details(&self, details: &PlaylistDetails) -> Result<String> {
        let mut out = format!("# {}\n\n## Basic Information\n\n", details.title);
        let _ = writeln!(out, "- **Playlist ID**: `{}`", details.playlist_id);
        let _ = writeln!(out, "- **URL**: {}", details.url);
        if let Some(uploader) = &details.uploader {
            let _ = writeln!(out, "- **Creator**: {}", uploader);
        }
        if let Some(channel) = &details.uploader_id {
            let _ = writeln!(out, "- **Channel ID**: `{}`", channel);
        }
        if let Some(count) = details.video_count {
            let _ = writeln!(out, "- **Total Videos**: {}", format_number(count));
        }
        if let Some(availability) = &details.availability {
            let _ = writeln!(out, "- **Availability**: {}", availability);
        }
        if let Some(modified) = &details.modified_date {
            let _ = writeln!(out, "- **Last Modified**: {}", format_date(modified));
        }
        out.push('\n');

        if let Some(views) = details.view_count {
            let _ = writeln!(out, "## Statistics\n\n- **Total Views**: {}\n", format_number(views));
        }

        push_description(&mut out, details.description.as_deref());
        push_tags(&mut out, &details.tags);

        Ok(out)
    }

    fn format_download_result(&self, result: &DownloadResult) -> Result<String> {
        let mut out = if result.success {
            String::from("# Download Complete\n\n")
        } else {
            String::from("# Download Failed\n\n")
        };

        let _ = writeln!(out, "- **Title**: {}", result.title);
        let _ = writeln!(out, "- **Video ID**: `{}`", result.video_id);
        if let Some(path) = &result.file_path {
            let _ = writeln!(out, "- **File**: `{}`", path);
        }
        if let Some(size) = result.file_size {
            let _ = writeln!(out, "- **Size**: {}", format_size(size));
        }
        if let Some(duration) = result.duration {
            let _ = writeln!(out, "- **Duration**: {}", format_duration(duration));
        }
        let _ = writeln!(out, "- **Format**: {}", result.format);
        let _ = writeln!(out, "- **Quality**: {}", result.quality);
        if let Some(error) = &result.error {
            let _ = writeln!(out, "- **Error**: {}", error);
        }

        Ok(out)
    }

    fn format_formats(&self, summary: &FormatSummary) -> Result<String> {
        let mut out = format!(
            "# Available Formats: {} ({} formats)\n\n- **Video ID**: `{}`\n\n",
            summary.title, summary.format_count, summary.video_id
        );
        if summary.formats.is_empty() {
            return Ok(out);
        }

        out.push_str("| Format ID | Extension | Resolution | Size | Note |\n");
        out.push_str("|-----------|-----------|------------|------|------|\n");
        for format in &summary.formats {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                format.format_id,
                format.ext,
                format.resolution.as_deref().unwrap_or("-"),
                format.filesize.map(format_size).unwrap_or_else(|| "-".to_string()),
                format.note.as_deref().unwrap_or("")
            );
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormatEntry;

    fn sample_video() -> Video {
        let mut video = Video::new("dQw4w9WgXcQ", "Rick Astley - Never Gonna Give You Up");
        video.duration = Some(212);
        video.view_count = Some(1_400_000_000);
        video.uploader = Some("Rick Astley".to_string());
        video.upload_date = Some("20091025".to_string());
        video.thumbnail = Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg".to_string());
        video
    }

    fn sample_details() -> VideoDetails {
        let mut details = VideoDetails::new(sample_video());
        details.uploader_id = Some("UCuAXFkgsw1L7xaCfnd5JJOw".to_string());
        details.description = Some("The official video for Never Gonna Give You Up".to_string());
        details.tags = vec!["rick astley".to_string(), "never gonna give you up".to_string()];
        details.categories = vec!["Music".to_string()];
        details.like_count = Some(15_000_000);
        details.comment_count = Some(2_500_000);
        details.age_limit = Some(0);
        details.formats_available = 25;
        details
    }

    fn sample_playlist() -> Playlist {
        let mut playlist = Playlist::new("PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf", "Python Tutorial Playlist");
        playlist.uploader = Some("Python Channel".to_string());
        playlist.uploader_id = Some("UCpython".to_string());
        playlist.video_count = Some(50);
        playlist.description = Some("Complete Python tutorial series".to_string());
        playlist
    }

    #[test]
    fn test_helpers() {
        assert_eq!(format_duration(3723), "1h 2m 3s");
        assert_eq!(format_duration(212), "3m 32s");
        assert_eq!(format_duration(0), "0m 0s");
        assert_eq!(format_number(1_400_000_000), "1,400,000,000");
        assert_eq!(format_number(100_000), "100,000");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_date("20091025"), "2009-10-25");
        assert_eq!(format_date("unknown"), "unknown");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(52_428_800), "50.0 MB");
        assert_eq!(truncate("héllo", 2), "hé...");
    }

    #[test]
    fn test_format_videos() {
        let output = MarkdownFormatter
            .format_videos(&[sample_video(), Video::new("abc123XYZ00", "Second Video")])
            .unwrap();

        assert!(output.contains("# Search Results (2 videos)"));
        assert!(output.contains("## 1. Rick Astley - Never Gonna Give You Up"));
        assert!(output.contains("## 2. Second Video"));
        assert!(output.contains("**Video ID**: `dQw4w9WgXcQ`"));
        assert!(output.contains("**URL**: https://youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(output.contains("**Duration**: 3m 32s"));
        assert!(output.contains("**Views**: 1,400,000,000"));
        assert!(output.contains("**Uploader**: Rick Astley"));
        assert!(output.contains("**Upload Date**: 2009-10-25"));
    }

    #[test]
    fn test_format_videos_minimal_and_empty() {
        let output = MarkdownFormatter
            .format_videos(&[Video::new("minimal001", "Minimal Video")])
            .unwrap();
        assert!(output.contains("**Video ID**: `minimal001`"));
        assert!(!output.contains("**Duration**"));
        assert!(!output.contains("**Uploader**"));

        let empty = MarkdownFormatter.format_videos(&[]).unwrap();
        assert!(empty.contains("# Search Results (0 videos)"));
    }

    #[test]
    fn test_format_video_details() {
        let output = MarkdownFormatter.format_video_details(&sample_details()).unwrap();

        assert!(output.contains("# Rick Astley - Never Gonna Give You Up"));
        assert!(output.contains("## Basic Information"));
        assert!(output.contains("**Channel ID**: `UCuAXFkgsw1L7xaCfnd5JJOw`"));
        assert!(output.contains("## Statistics"));
        assert!(output.contains("**Likes**: 15,000,000"));
        assert!(output.contains("**Comments**: 2,500,000"));
        assert!(output.contains("## Description"));
        assert!(output.contains("## Tags"));
        assert!(output.contains("`never gonna give you up`"));
        assert!(output.contains("## Categories"));
        assert!(output.contains("Music"));
        assert!(output.contains("**Age Restriction**: No age restriction"));
        assert!(output.contains("**Available Formats**: 25"));
    }

    #[test]
    fn test_video_details_truncation() {
        let mut details = VideoDetails::new(Video::new("longdesc001", "Long"));
        details.description = Some("A".repeat(600));
        details.tags = (0..25).map(|i| format!("tag{}", i)).collect();
        details.age_limit = Some(18);

        let output = MarkdownFormatter.format_video_details(&details).unwrap();
        assert!(output.contains(&format!("{}...", "A".repeat(500))));
        assert!(!output.contains(&"A".repeat(501)));
        assert!(output.contains("`tag19`"));
        assert!(!output.contains("`tag20`"));
        assert!(output.contains("...and 5 more tags"));
        assert!(output.contains("**Age Restriction**: 18+"));
        assert!(!output.contains("**Available Formats**"));
    }

    #[test]
    fn test_format_playlists() {
        let mut long = Playlist::new("PLlongdesc", "Long Description Playlist");
        long.description = Some("B".repeat(200));

        let output = MarkdownFormatter.format_playlists(&[sample_playlist(), long]).unwrap();
        assert!(output.contains("# Playlist Search Results (2 playlists)"));
        assert!(output.contains("## 1. Python Tutorial Playlist"));
        assert!(output.contains("**Playlist ID**: `PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf`"));
        assert!(output.contains("**Creator**: Python Channel"));
        assert!(output.contains("**Videos**: 50"));
        assert!(output.contains("**Description**: Complete Python tutorial series"));
        assert!(output.contains(&format!("{}...", "B".repeat(150))));
        assert!(!output.contains(&"B".repeat(151)));

        let empty = MarkdownFormatter.format_playlists(&[]).unwrap();
        assert!(empty.contains("# Playlist Search Results (0 playlists)"));
    }

    #[test]
    fn test_format_playlist_details() {
        let mut details = PlaylistDetails::new(sample_playlist());
        details.playlist.modified_date = Some("20240101".to_string());
        details.availability = Some("public".to_string());
        details.tags = vec!["python".to_string(), "tutorial".to_string()];
        details.view_count = Some(100_000);

        let output = MarkdownFormatter.format_playlist_details(&details).unwrap();
        assert!(output.contains("# Python Tutorial Playlist"));
        assert!(output.contains("**Channel ID**: `UCpython`"));
        assert!(output.contains("**Total Videos**: 50"));
        assert!(output.contains("**Availability**: public"));
        assert!(output.contains("**Last Modified**: 2024-01-01"));
        assert!(output.contains("**Total Views**: 100,000"));
        assert!(output.contains("`tutorial`"));
        assert!(output.contains("## Description"));
    }

    #[test]
    fn test_format_download_result() {
        let ok = DownloadResult {
            success: true,
            video_id: "dQw4w9WgXcQ".to_string(),
            title: "Never Gonna Give You Up".to_string(),
            file_path: Some("downloads/never.mp4".to_string()),
            file_size: Some(52_428_800),
            duration: Some(212),
            format: "mp4".to_string(),
            quality: "high".to_string(),
            error: None,
        };
        let output = MarkdownFormatter.format_download_result(&ok).unwrap();
        assert!(output.starts_with("# Download Complete"));
        assert!(output.contains("**Size**: 50.0 MB"));

        let failed = DownloadResult::failure("dQw4w9WgXcQ", "mp3", "best", "Video unavailable");
        let output = MarkdownFormatter.format_download_result(&failed).unwrap();
        assert!(output.starts_with("# Download Failed"));
        assert!(output.contains("**Error**: Video unavailable"));
    }

    #[test]
    fn test_format_formats() {
        let summary = FormatSummary {
            video_id: "dQw4w9WgXcQ".to_string(),
            title: "Test Video".to_string(),
            format_count: 1,
            formats: vec![FormatEntry {
                format_id: "22".to_string(),
                ext: "mp4".to_string(),
                resolution: Some("1280x720".to_string()),
                filesize: None,
                note: Some("720p".to_string()),
            }],
        };
        let output = MarkdownFormatter.format_formats(&summary).unwrap();
        assert!(output.contains("# Available Formats: Test Video (1 formats)"));
        assert!(output.contains("| 22 | mp4 | 1280x720 | - | 720p |"));
    }
}
