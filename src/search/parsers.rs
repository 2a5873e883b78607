//! Mapping of yt-dlp info dictionaries onto typed records
//!
//! yt-dlp omits fields freely and sometimes reports counts as floats, so
//! every lookup here is lenient: wrong types read as absent.

use crate::models::playlist::playlist_url;
use crate::models::video::watch_url;
use crate::models::{FormatEntry, Playlist, PlaylistDetails, Video, VideoDetails};
use chrono::DateTime;
use serde_json::Value;

fn str_field(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(Value::as_str).map(str::to_string)
}

/// First of `keys` holding a string
fn str_field_any(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| str_field(data, key))
}

/// Non-negative count given as integer or float
fn count_field(data: &Value, key: &str) -> Option<u64> {
    let value = data.get(key)?;
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

fn timestamp_field(data: &Value, key: &str) -> Option<i64> {
    let value = data.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

fn string_list(data: &Value, key: &str) -> Vec<String> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn array_len(data: &Value, key: &str) -> Option<usize> {
    data.get(key).and_then(Value::as_array).map(Vec::len)
}

/// Thumbnail URL: the `thumbnail` string, else the last (largest) `thumbnails` entry.
pub fn extract_thumbnail_url(data: &Value) -> Option<String> {
    if let Some(url) = str_field(data, "thumbnail") {
        return Some(url);
    }

    let last = data.get("thumbnails")?.as_array()?.last()?;
    last.get("url").and_then(Value::as_str).map(str::to_string)
}

/// Unix timestamp → `YYYYMMDD` (UTC).
///
/// Zero, negative and out-of-range timestamps give `None`.
pub fn timestamp_to_date(timestamp: Option<i64>) -> Option<String> {
    let ts = timestamp.filter(|ts| *ts > 0)?;
    DateTime::from_timestamp(ts, 0).map(|dt| dt.format("%Y%m%d").to_string())
}

/// Search result entry → [`Video`]
pub fn parse_video(data: &Value) -> Video {
    let video_id = str_field(data, "id").unwrap_or_default();
    let timestamp = timestamp_field(data, "timestamp");

    Video {
        url: watch_url(&video_id),
        title: str_field(data, "title").unwrap_or_else(|| "Unknown".to_string()),
        duration: count_field(data, "duration"),
        view_count: count_field(data, "view_count"),
        uploader: str_field_any(data, &["uploader", "channel"]),
        upload_date: str_field(data, "upload_date").or_else(|| timestamp_to_date(timestamp)),
        thumbnail: extract_thumbnail_url(data),
        timestamp,
        release_timestamp: timestamp_field(data, "release_timestamp"),
        video_id,
    }
}

/// Full video info → [`VideoDetails`]
pub fn parse_video_details(data: &Value) -> VideoDetails {
    VideoDetails {
        video: parse_video(data),
        uploader_id: str_field_any(data, &["uploader_id", "channel_id"]),
        description: str_field(data, "description"),
        tags: string_list(data, "tags"),
        categories: string_list(data, "categories"),
        like_count: count_field(data, "like_count"),
        comment_count: count_field(data, "comment_count"),
        age_limit: count_field(data, "age_limit").map(|n| n.min(u32::MAX as u64) as u32),
        formats_available: array_len(data, "formats").unwrap_or(0),
    }
}

/// Playlist search entry → [`Playlist`]
pub fn parse_playlist(data: &Value) -> Playlist {
    let playlist_id = str_field(data, "id").unwrap_or_default();

    Playlist {
        url: playlist_url(&playlist_id),
        title: str_field(data, "title").unwrap_or_else(|| "Unknown".to_string()),
        uploader: str_field_any(data, &["uploader", "channel"]),
        uploader_id: str_field_any(data, &["uploader_id", "channel_id"]),
        video_count: count_field(data, "playlist_count").or_else(|| count_field(data, "n_entries")),
        thumbnail: extract_thumbnail_url(data),
        description: str_field(data, "description"),
        modified_date: str_field(data, "modified_date"),
        playlist_id,
    }
}

/// Full playlist info → [`PlaylistDetails`]
pub fn parse_playlist_details(data: &Value) -> PlaylistDetails {
    let mut playlist = parse_playlist(data);
    if playlist.video_count.is_none() {
        playlist.video_count = array_len(data, "entries").map(|n| n as u64);
    }

    PlaylistDetails {
        playlist,
        availability: str_field(data, "availability"),
        tags: string_list(data, "tags"),
        view_count: count_field(data, "view_count"),
    }
}

/// `formats` array → [`FormatEntry`] list
pub fn parse_formats(data: &Value) -> Vec<FormatEntry> {
    let Some(formats) = data.get("formats").and_then(Value::as_array) else {
        return Vec::new();
    };

    formats
        .iter()
        .filter_map(|format| {
            let format_id = str_field(format, "format_id")?;
            Some(FormatEntry {
                format_id,
                ext: str_field(format, "ext").unwrap_or_else(|| "unknown".to_string()),
                resolution: str_field(format, "resolution"),
                filesize: count_field(format, "filesize")
                    .or_else(|| count_field(format, "filesize_approx")),
                note: str_field(format, "format_note"),
            })
        })
        .collect()
}
