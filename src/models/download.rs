//! Download outcomes and format listings

use serde::{Deserialize, Serialize};

/// Outcome of a download request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadResult {
    pub success: bool,
    pub video_id: String,
    pub title: String,
    pub file_path: Option<String>,
    pub file_size: Option<u64>,
    pub duration: Option<u64>,
    pub format: String,
    pub quality: String,
    pub error: Option<String>,
}

impl DownloadResult {
    /// Failed download; the title is unknown.
    pub fn failure(
        video_id: impl Into<String>,
        format: impl Into<String>,
        quality: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            video_id: video_id.into(),
            title: "Unknown".to_string(),
            file_path: None,
            file_size: None,
            duration: None,
            format: format.into(),
            quality: quality.into(),
            error: Some(error.into()),
        }
    }
}

/// One downloadable format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatEntry {
    pub format_id: String,
    pub ext: String,
    pub resolution: Option<String>,
    pub filesize: Option<u64>,
    pub note: Option<String>,
}

/// Formats offered for a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatSummary {
    pub video_id: String,
    pub title: String,
    pub format_count: usize,
    pub formats: Vec<FormatEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_result_serializes() {
        let result = DownloadResult {
            success: true,
            video_id: "dQw4w9WgXcQ".to_string(),
            title: "Test Video".to_string(),
            file_path: Some("/downloads/test.mp4".to_string()),
            file_size: Some(52428800),
            duration: Some(212),
            format: "mp4".to_string(),
            quality: "high".to_string(),
            error: None,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["file_size"], json!(52428800));
        assert_eq!(value["error"], json!(null));
    }

    #[test]
    fn test_failure_result() {
        let result = DownloadResult::failure("notexistent", "mp4", "best", "Video not found");
        assert!(!result.success);
        assert_eq!(result.title, "Unknown");
        assert!(result.file_path.is_none());

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"], json!("Video not found"));
    }
}
