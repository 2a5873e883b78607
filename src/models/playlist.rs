//! Playlist records

use serde::{Deserialize, Serialize};

/// Playlist URL for a playlist id
pub fn playlist_url(playlist_id: &str) -> String {
    format!("https://youtube.com/playlist?list={}", playlist_id)
}

/// A playlist search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub playlist_id: String,
    pub title: String,
    pub url: String,
    pub uploader: Option<String>,
    pub uploader_id: Option<String>,
    pub video_count: Option<u64>,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    /// `YYYYMMDD`
    pub modified_date: Option<String>,
}

impl Playlist {
    pub fn new(playlist_id: impl Into<String>, title: impl Into<String>) -> Self {
        let playlist_id = playlist_id.into();
        Self {
            url: playlist_url(&playlist_id),
            playlist_id,
            title: title.into(),
            uploader: None,
            uploader_id: None,
            video_count: None,
            thumbnail: None,
            description: None,
            modified_date: None,
        }
    }
}

/// Full playlist metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistDetails {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub availability: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub view_count: Option<u64>,
}

impl PlaylistDetails {
    pub fn new(playlist: Playlist) -> Self {
        Self {
            playlist,
            availability: None,
            tags: Vec::new(),
            view_count: None,
        }
    }
}

impl std::ops::Deref for PlaylistDetails {
    type Target = Playlist;

    fn deref(&self) -> &Playlist {
        &self.playlist
    }
}
