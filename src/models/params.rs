//! Validated request parameters

use crate::utils::error::{Result, YtSearchError};
use crate::utils::validators::{validate_query, validate_video_id};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_MAX_RESULTS: usize = 10;
pub const MAX_RESULTS_LIMIT: usize = 50;

pub const VIDEO_FORMATS: &[&str] = &["mp4", "webm", "mkv"];
pub const AUDIO_FORMATS: &[&str] = &["mp3", "m4a", "opus", "wav", "flac"];

/// Result ordering for video searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Relevance,
    UploadDate,
    ViewCount,
    Rating,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::UploadDate => "upload_date",
            SortBy::ViewCount => "view_count",
            SortBy::Rating => "rating",
        }
    }
}

impl FromStr for SortBy {
    type Err = YtSearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "relevance" => Ok(SortBy::Relevance),
            "upload_date" => Ok(SortBy::UploadDate),
            "view_count" => Ok(SortBy::ViewCount),
            "rating" => Ok(SortBy::Rating),
            other => Err(YtSearchError::Validation(format!(
                "Invalid sort_by '{}'. Must be one of: relevance, upload_date, view_count, rating",
                other
            ))),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Video search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub max_results: usize,
    pub sort_by: SortBy,
}

impl SearchParams {
    /// Search for `query` with default count and ordering.
    pub fn new(query: &str) -> Result<Self> {
        Ok(Self {
            query: validate_query(Some(query))?,
            max_results: DEFAULT_MAX_RESULTS,
            sort_by: SortBy::default(),
        })
    }

    pub fn with_max_results(mut self, max_results: usize) -> Result<Self> {
        if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
            return Err(YtSearchError::Validation(format!(
                "max_results must be between 1 and {}, got {}",
                MAX_RESULTS_LIMIT, max_results
            )));
        }
        self.max_results = max_results;
        Ok(self)
    }

    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }
}

/// Download quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Best,
    High,
    Medium,
    Low,
}

impl Quality {
    pub const ALL: [Quality; 4] = [Quality::Best, Quality::High, Quality::Medium, Quality::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Best => "best",
            Quality::High => "high",
            Quality::Medium => "medium",
            Quality::Low => "low",
        }
    }
}

impl FromStr for Quality {
    type Err = YtSearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "best" => Ok(Quality::Best),
            "high" => Ok(Quality::High),
            "medium" => Ok(Quality::Medium),
            "low" => Ok(Quality::Low),
            other => Err(YtSearchError::Validation(format!(
                "Invalid quality '{}'. Must be one of: best, high, medium, low",
                other
            ))),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a download produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadType {
    #[default]
    Video,
    Audio,
}

impl DownloadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadType::Video => "video",
            DownloadType::Audio => "audio",
        }
    }

    /// Output formats accepted for this download type
    pub fn allowed_formats(&self) -> &'static [&'static str] {
        match self {
            DownloadType::Video => VIDEO_FORMATS,
            DownloadType::Audio => AUDIO_FORMATS,
        }
    }

    pub fn default_format(&self) -> &'static str {
        match self {
            DownloadType::Video => "mp4",
            DownloadType::Audio => "mp3",
        }
    }
}

impl FromStr for DownloadType {
    type Err = YtSearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "video" => Ok(DownloadType::Video),
            "audio" => Ok(DownloadType::Audio),
            other => Err(YtSearchError::Validation(format!(
                "Invalid download_type '{}'. Must be 'video' or 'audio'",
                other
            ))),
        }
    }
}

/// Download request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadParams {
    pub video_id: String,
    pub quality: Quality,
    pub output_dir: Option<PathBuf>,
    pub format: String,
    pub download_type: DownloadType,
    /// Custom file stem, sanitized before use
    pub filename: Option<String>,
}

impl DownloadParams {
    /// Video download of `video_id` at best quality as mp4.
    pub fn new(video_id: &str) -> Result<Self> {
        Self::with_type(video_id, DownloadType::Video)
    }

    /// Audio download of `video_id` at best quality as mp3.
    pub fn audio(video_id: &str) -> Result<Self> {
        Self::with_type(video_id, DownloadType::Audio)
    }

    fn with_type(video_id: &str, download_type: DownloadType) -> Result<Self> {
        if !validate_video_id(video_id) {
            return Err(YtSearchError::Validation(format!(
                "Invalid video ID '{}'. Video IDs are 11 characters of letters, digits, '_' or '-'",
                video_id
            )));
        }
        Ok(Self {
            video_id: video_id.to_string(),
            quality: Quality::default(),
            output_dir: None,
            format: download_type.default_format().to_string(),
            download_type,
            filename: None,
        })
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the output format; it must suit the download type.
    pub fn with_format(mut self, format: &str) -> Result<Self> {
        let format = format.to_lowercase();
        let allowed = self.download_type.allowed_formats();
        if !allowed.contains(&format.as_str()) {
            return Err(YtSearchError::Validation(format!(
                "Invalid {} format '{}'. Must be one of: {}",
                self.download_type.as_str(),
                format,
                allowed.join(", ")
            )));
        }
        self.format = format;
        Ok(self)
    }
}
