//! Input validation for tool arguments

use crate::utils::error::{Result, YtSearchError};

/// Length of a YouTube video id
pub const VIDEO_ID_LEN: usize = 11;

/// Maximum search query length, in characters
pub const MAX_QUERY_LEN: usize = 200;

const MAX_FILENAME_LEN: usize = 200;

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Checks that `video_id` looks like a YouTube video id (11 chars of `[A-Za-z0-9_-]`).
pub fn validate_video_id(video_id: &str) -> bool {
    video_id.len() == VIDEO_ID_LEN && video_id.chars().all(is_id_char)
}

/// Checks that `playlist_id` looks like a YouTube playlist id.
pub fn validate_playlist_id(playlist_id: &str) -> bool {
    (2..=64).contains(&playlist_id.len()) && playlist_id.chars().all(is_id_char)
}

/// Validates a search query and returns it trimmed.
pub fn validate_query(query: Option<&str>) -> Result<String> {
    let trimmed = query.map(str::trim).unwrap_or_default();

    if trimmed.is_empty() {
        return Err(YtSearchError::InvalidQuery(
            "Query cannot be empty".to_string(),
        ));
    }

    let len = trimmed.chars().count();
    if len > MAX_QUERY_LEN {
        return Err(YtSearchError::InvalidQuery(format!(
            "Query too long ({} characters, maximum is {})",
            len, MAX_QUERY_LEN
        )));
    }

    Ok(trimmed.to_string())
}

/// Sanitizes a string for use as a file name.
///
/// Characters that are invalid on Windows/macOS/Linux filesystems become `_`,
/// surrounding whitespace and dots are stripped, and names longer than 200
/// characters are cut while keeping a short extension.
///
/// # Examples
/// ```
/// use ytsearch_mcp::utils::validators::sanitize_filename;
/// assert_eq!(sanitize_filename("file:name.mp4"), "file_name.mp4");
/// assert_eq!(sanitize_filename("...hidden"), "hidden");
/// assert_eq!(sanitize_filename("..."), "unnamed");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let invalid_chars = ['<', '>', ':', '"', '/', '\\', '|', '?', '*', '\0'];

    let replaced: String = name
        .chars()
        .map(|c| if invalid_chars.contains(&c) { '_' } else { c })
        .collect();

    let sanitized = replaced
        .trim()
        .trim_matches('.')
        .trim()
        .to_string();

    if sanitized.is_empty() {
        return "unnamed".to_string();
    }

    if sanitized.chars().count() <= MAX_FILENAME_LEN {
        return sanitized;
    }

    // Keep the extension when it is short enough to be a real one
    if let Some(dot_pos) = sanitized.rfind('.') {
        let extension = &sanitized[dot_pos..];
        let ext_len = extension.chars().count();
        if ext_len < 10 {
            let stem: String = sanitized[..dot_pos]
                .chars()
                .take(MAX_FILENAME_LEN - ext_len)
                .collect();
            return format!("{}{}", stem, extension);
        }
    }

    sanitized.chars().take(MAX_FILENAME_LEN).collect()
}
