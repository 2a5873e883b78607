//! Download engine driving yt-dlp through a media backend

use crate::downloader::presets::{audio_extraction, audio_format_selector, video_format_selector};
use crate::downloader::progress::ProgressTracker;
use crate::extractor::{MediaBackend, YtDlpOptions};
use crate::models::{watch_url, DownloadParams, DownloadResult, FormatSummary};
use crate::search::classify::classify_failure;
use crate::search::parsers::{parse_formats, parse_video};
use crate::utils::error::{Result, YtSearchError};
use crate::utils::fs::{get_file_size, get_unique_filename, validate_download_path, PathIssue};
use crate::utils::platform::{ffmpeg_installation_guide, find_ffmpeg};
use crate::utils::validators::sanitize_filename;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Template used when no custom filename is requested
const DEFAULT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Media downloads
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download_video(&self, params: &DownloadParams) -> Result<DownloadResult>;

    async fn download_audio(&self, params: &DownloadParams) -> Result<DownloadResult>;

    /// Formats yt-dlp can fetch for `video_id`
    async fn get_available_formats(&self, video_id: &str) -> Result<FormatSummary>;
}

/// [`Downloader`] running yt-dlp through a [`MediaBackend`]
pub struct YtDlpDownloader {
    backend: Arc<dyn MediaBackend>,
    default_output_dir: PathBuf,
    min_disk_space_mb: u64,
    ffmpeg: Option<PathBuf>,
    socket_timeout: u64,
}

impl YtDlpDownloader {
    pub fn new(backend: Arc<dyn MediaBackend>) -> Self {
        Self {
            backend,
            default_output_dir: PathBuf::from("downloads"),
            min_disk_space_mb: 100,
            ffmpeg: find_ffmpeg(),
            socket_timeout: 30,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.default_output_dir = dir.into();
        self
    }

    pub fn with_min_disk_space(mut self, mb: u64) -> Self {
        self.min_disk_space_mb = mb;
        self
    }

    /// Override the ffmpeg binary found at construction
    pub fn with_ffmpeg(mut self, ffmpeg: Option<PathBuf>) -> Self {
        self.ffmpeg = ffmpeg;
        self
    }

    pub fn with_socket_timeout(mut self, seconds: u64) -> Self {
        self.socket_timeout = seconds;
        self
    }

    pub fn default_output_dir(&self) -> &Path {
        &self.default_output_dir
    }

    pub fn min_disk_space_mb(&self) -> u64 {
        self.min_disk_space_mb
    }

    pub fn ffmpeg(&self) -> Option<&Path> {
        self.ffmpeg.as_deref()
    }

    fn require_ffmpeg(&self) -> Result<()> {
        match self.ffmpeg {
            Some(_) => Ok(()),
            None => Err(YtSearchError::FfmpegNotFound(ffmpeg_installation_guide())),
        }
    }

    /// Resolve the output directory and make sure it can take a download.
    pub async fn validate_output_directory(&self, output_dir: Option<&Path>) -> Result<PathBuf> {
        let dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_output_dir.clone());
        let min_space = self.min_disk_space_mb;

        let checked = dir.clone();
        let outcome = tokio::task::spawn_blocking(move || validate_download_path(&checked, min_space))
            .await
            .map_err(|e| YtSearchError::Download(format!("Directory check failed: {}", e)))?;

        match outcome {
            Ok(()) => Ok(dir),
            Err(issue @ PathIssue::InsufficientSpace { .. }) => {
                Err(YtSearchError::DiskSpace(format!("{}: {}", dir.display(), issue)))
            }
            Err(issue) => Err(YtSearchError::Download(format!(
                "Invalid output directory {}: {}",
                dir.display(),
                issue
            ))),
        }
    }

    /// Output template inside `dir`, honoring a custom filename
    fn output_template(&self, params: &DownloadParams, dir: &Path) -> String {
        let template = match &params.filename {
            Some(name) => {
                let stem = sanitize_filename(name);
                let unique = get_unique_filename(dir, &format!("{}.{}", stem, params.format));
                let stem = unique
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or(stem);
                dir.join(format!("{}.%(ext)s", stem))
            }
            None => dir.join(DEFAULT_TEMPLATE),
        };
        template.to_string_lossy().to_string()
    }

    pub fn build_video_options(&self, params: &DownloadParams, dir: &Path) -> YtDlpOptions {
        YtDlpOptions {
            socket_timeout: Some(self.socket_timeout),
            format: Some(video_format_selector(params.quality).to_string()),
            merge_output_format: Some(params.format.clone()),
            output_template: Some(self.output_template(params, dir)),
            ffmpeg_location: self.ffmpeg.clone(),
            no_playlist: true,
            ..YtDlpOptions::default()
        }
    }

    pub fn build_audio_options(&self, params: &DownloadParams, dir: &Path) -> YtDlpOptions {
        YtDlpOptions {
            socket_timeout: Some(self.socket_timeout),
            format: Some(audio_format_selector(params.quality).to_string()),
            output_template: Some(self.output_template(params, dir)),
            extract_audio: Some(audio_extraction(&params.format, params.quality)),
            ffmpeg_location: self.ffmpeg.clone(),
            no_playlist: true,
            ..YtDlpOptions::default()
        }
    }

    async fn download(&self, params: &DownloadParams, options: YtDlpOptions) -> Result<DownloadResult> {
        info!(
            "Downloading {} {} ({} / {})",
            params.download_type.as_str(),
            params.video_id,
            params.quality,
            params.format
        );

        let tracker = ProgressTracker::new(params.video_id.clone());
        let info = self
            .backend
            .extract(&watch_url(&params.video_id), &options, Some(&tracker))
            .await
            .map_err(|failure| {
                warn!("Download of {} failed: {}", params.video_id, failure);
                classify_failure(failure, Some(YtSearchError::VideoNotFound), YtSearchError::Download)
            })?;

        let path = extract_file_path(&info, tracker.snapshot().filename.as_deref())?;
        let file_size = get_file_size(&path);
        let video = parse_video(&info);

        info!("Downloaded {} to {}", params.video_id, path.display());
        Ok(DownloadResult {
            success: true,
            video_id: params.video_id.clone(),
            title: video.title,
            file_path: Some(path.to_string_lossy().to_string()),
            file_size,
            duration: video.duration,
            format: params.format.clone(),
            quality: params.quality.to_string(),
            error: None,
        })
    }
}

/// Where yt-dlp wrote the final file.
///
/// Candidates in order: the last requested download, `filepath`, `_filename`,
/// `filename`, then the last file named in the progress output. The first
/// one present on disk wins.
pub fn extract_file_path(info: &Value, reported: Option<&str>) -> Result<PathBuf> {
    let requested = info
        .get("requested_downloads")
        .and_then(Value::as_array)
        .and_then(|downloads| downloads.last())
        .and_then(|last| last.get("filepath"))
        .and_then(Value::as_str);

    let candidates = [
        requested,
        info.get("filepath").and_then(Value::as_str),
        info.get("_filename").and_then(Value::as_str),
        info.get("filename").and_then(Value::as_str),
        reported,
    ];

    let mut named = false;
    for candidate in candidates.into_iter().flatten() {
        named = true;
        let path = PathBuf::from(candidate);
        if path.exists() {
            return Ok(path);
        }
        debug!("Candidate output {} does not exist", candidate);
    }

    if named {
        Err(YtSearchError::Download("Downloaded file not found on disk".to_string()))
    } else {
        Err(YtSearchError::Download(
            "Could not determine downloaded file path".to_string(),
        ))
    }
}

#[async_trait]
impl Downloader for YtDlpDownloader {
    async fn download_video(&self, params: &DownloadParams) -> Result<DownloadResult> {
        self.require_ffmpeg()?;
        let dir = self.validate_output_directory(params.output_dir.as_deref()).await?;
        let options = self.build_video_options(params, &dir);
        self.download(params, options).await
    }

    async fn download_audio(&self, params: &DownloadParams) -> Result<DownloadResult> {
        self.require_ffmpeg()?;
        let dir = self.validate_output_directory(params.output_dir.as_deref()).await?;
        let options = self.build_audio_options(params, &dir);
        self.download(params, options).await
    }

    async fn get_available_formats(&self, video_id: &str) -> Result<FormatSummary> {
        debug!("Listing formats for {}", video_id);

        let mut options = YtDlpOptions::metadata(self.socket_timeout);
        options.no_playlist = true;

        let info = self
            .backend
            .extract(&watch_url(video_id), &options, None)
            .await
            .map_err(|failure| {
                classify_failure(failure, Some(YtSearchError::VideoNotFound), YtSearchError::Download)
            })?;

        let formats = parse_formats(&info);
        Ok(FormatSummary {
            video_id: video_id.to_string(),
            title: parse_video(&info).title,
            format_count: formats.len(),
            formats,
        })
    }
}
