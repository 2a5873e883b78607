//! Video records returned by searches and lookups

use serde::{Deserialize, Serialize};

/// Watch URL for a video id
pub fn watch_url(video_id: &str) -> String {
    format!("https://youtube.com/watch?v={}", video_id)
}

/// A single search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub video_id: String,
    pub title: String,
    pub url: String,
    /// Length in seconds
    pub duration: Option<u64>,
    pub view_count: Option<u64>,
    pub uploader: Option<String>,
    /// `YYYYMMDD`
    pub upload_date: Option<String>,
    pub thumbnail: Option<String>,
    pub timestamp: Option<i64>,
    pub release_timestamp: Option<i64>,
}

impl Video {
    /// Video with only the required fields set; the URL is derived from the id.
    pub fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        let video_id = video_id.into();
        Self {
            url: watch_url(&video_id),
            video_id,
            title: title.into(),
            duration: None,
            view_count: None,
            uploader: None,
            upload_date: None,
            thumbnail: None,
            timestamp: None,
            release_timestamp: None,
        }
    }
}

/// Full metadata for one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    #[serde(flatten)]
    pub video: Video,
    pub uploader_id: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub age_limit: Option<u32>,
    #[serde(default)]
    pub formats_available: usize,
}

impl VideoDetails {
    pub fn new(video: Video) -> Self {
        Self {
            video,
            uploader_id: None,
            description: None,
            tags: Vec::new(),
            categories: Vec::new(),
            like_count: None,
            comment_count: None,
            age_limit: None,
            formats_available: 0,
        }
    }
}

impl std::ops::Deref for VideoDetails {
    type Target = Video;

    fn deref(&self) -> &Video {
        &self.video
    }
}
