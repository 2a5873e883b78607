//! Search provider backed by yt-dlp

use crate::extractor::{MediaBackend, YtDlpOptions};
use crate::models::{Playlist, PlaylistDetails, SearchParams, SortBy, Video, VideoDetails};
use crate::search::classify::classify_failure;
use crate::search::parsers::{parse_playlist, parse_playlist_details, parse_video, parse_video_details};
use crate::search::retry::{retry_async, RetryPolicy};
use crate::utils::error::{Result, YtSearchError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Results-page filter that only returns playlists
const PLAYLIST_FILTER: &str = "EgIQAw%3D%3D";

/// Search and metadata lookups
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, params: &SearchParams) -> Result<Vec<Video>>;

    async fn get_video_details(&self, video_id: &str) -> Result<VideoDetails>;

    async fn search_playlists(&self, query: &str, max_results: usize) -> Result<Vec<Playlist>>;

    async fn get_playlist_details(&self, playlist_id: &str) -> Result<PlaylistDetails>;

    async fn get_playlist_videos(&self, playlist_id: &str, max_results: usize) -> Result<Vec<Video>>;

    /// Run a minimal search, reporting why it failed
    async fn check_connection(&self) -> Result<()>;

    /// Whether the provider is usable; never fails
    async fn validate_connection(&self) -> bool {
        self.check_connection().await.is_ok()
    }
}

/// [`SearchProvider`] running yt-dlp through a [`MediaBackend`]
pub struct YtDlpSearchProvider {
    backend: Arc<dyn MediaBackend>,
    max_results_default: usize,
    timeout: u64,
    retry: RetryPolicy,
}

impl YtDlpSearchProvider {
    pub fn new(backend: Arc<dyn MediaBackend>) -> Self {
        Self {
            backend,
            max_results_default: 10,
            timeout: 30,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_max_results_default(mut self, max_results: usize) -> Self {
        self.max_results_default = max_results;
        self
    }

    /// Socket timeout handed to yt-dlp, in seconds
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attempts for calls failing with network errors
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retry.max_attempts = retries;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn max_results_default(&self) -> usize {
        self.max_results_default
    }

    /// A count of zero means the configured default
    fn result_count(&self, max_results: usize) -> usize {
        match max_results {
            0 => self.max_results_default.max(1),
            n => n,
        }
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn retries(&self) -> u32 {
        self.retry.max_attempts
    }

    /// Quiet, metadata-only options shared by every lookup
    pub fn base_options(&self) -> YtDlpOptions {
        YtDlpOptions::metadata(self.timeout)
    }

    /// Run the backend, retrying network failures
    async fn extract(
        &self,
        target: &str,
        options: YtDlpOptions,
        unavailable: Option<fn(String) -> YtSearchError>,
    ) -> Result<Value> {
        let backend = &self.backend;
        let options = &options;

        retry_async(
            self.retry,
            |e: &YtSearchError| e.is_retryable(),
            || async move {
                backend
                    .extract(target, options, None)
                    .await
                    .map_err(|failure| {
                        classify_failure(failure, unavailable, YtSearchError::SearchProvider)
                    })
            },
        )
        .await
    }
}

/// Object entries of a search/playlist result
fn entries(data: &Value) -> Vec<&Value> {
    data.get("entries")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|entry| entry.is_object()).collect())
        .unwrap_or_default()
}

/// Whether a search entry refers to a playlist
fn is_playlist_entry(entry: &Value) -> bool {
    let url = entry.get("url").and_then(Value::as_str);
    let ie_key = entry.get("ie_key").and_then(Value::as_str);

    entry.get("_type").and_then(Value::as_str) == Some("playlist")
        || (url.is_some() && ie_key == Some("YoutubeTab"))
        || url.is_some_and(|u| u.contains("list="))
}

fn sort_videos(videos: &mut [Video], sort_by: SortBy) {
    match sort_by {
        SortBy::ViewCount => videos.sort_by(|a, b| b.view_count.cmp(&a.view_count)),
        // Upload-date ordering comes from `ytsearchdate`; rating has no upstream
        // ordering, so relevance order is kept
        SortBy::Relevance | SortBy::UploadDate | SortBy::Rating => {}
    }
}

fn watch_target(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

fn playlist_target(playlist_id: &str) -> String {
    format!("https://www.youtube.com/playlist?list={}", playlist_id)
}

#[async_trait]
impl SearchProvider for YtDlpSearchProvider {
    async fn search(&self, params: &SearchParams) -> Result<Vec<Video>> {
        let prefix = match params.sort_by {
            SortBy::UploadDate => "ytsearchdate",
            _ => "ytsearch",
        };
        let target = format!("{}{}:{}", prefix, params.max_results, params.query);
        debug!("Searching: {} (sort: {})", target, params.sort_by);

        let data = self.extract(&target, self.base_options().flat(), None).await?;

        let mut videos: Vec<Video> = entries(&data).into_iter().map(parse_video).collect();
        sort_videos(&mut videos, params.sort_by);
        videos.truncate(params.max_results);

        info!("Found {} videos for query '{}'", videos.len(), params.query);
        Ok(videos)
    }

    async fn get_video_details(&self, video_id: &str) -> Result<VideoDetails> {
        debug!("Fetching video details for {}", video_id);

        let mut options = self.base_options();
        options.no_playlist = true;

        let data = self
            .extract(&watch_target(video_id), options, Some(YtSearchError::VideoNotFound))
            .await?;
        Ok(parse_video_details(&data))
    }

    async fn search_playlists(&self, query: &str, max_results: usize) -> Result<Vec<Playlist>> {
        let max_results = self.result_count(max_results);
        let fetch = max_results * 3;
        let options = self
            .base_options()
            .flat()
            .with_playlist_items(format!("1:{}", fetch));

        let results_page = format!(
            "https://www.youtube.com/results?search_query={}&sp={}",
            urlencoding::encode(query),
            PLAYLIST_FILTER
        );

        let data = match self.extract(&results_page, options.clone(), None).await {
            Ok(data) => data,
            Err(e) => {
                warn!("Playlist results page failed ({}), falling back to keyword search", e);
                let fallback = format!("ytsearch{}:{} playlist", fetch, query);
                self.extract(&fallback, self.base_options().flat(), None).await?
            }
        };

        let playlists: Vec<Playlist> = entries(&data)
            .into_iter()
            .filter(|entry| is_playlist_entry(entry))
            .take(max_results)
            .map(parse_playlist)
            .collect();

        info!("Found {} playlists for query '{}'", playlists.len(), query);
        Ok(playlists)
    }

    async fn get_playlist_details(&self, playlist_id: &str) -> Result<PlaylistDetails> {
        debug!("Fetching playlist details for {}", playlist_id);

        let data = self
            .extract(
                &playlist_target(playlist_id),
                self.base_options().flat(),
                Some(YtSearchError::VideoNotFound),
            )
            .await?;
        Ok(parse_playlist_details(&data))
    }

    async fn get_playlist_videos(&self, playlist_id: &str, max_results: usize) -> Result<Vec<Video>> {
        let max_results = self.result_count(max_results);
        let options = self
            .base_options()
            .flat()
            .with_playlist_items(format!("1:{}", max_results));

        let data = self
            .extract(
                &playlist_target(playlist_id),
                options,
                Some(YtSearchError::VideoNotFound),
            )
            .await?;

        let videos: Vec<Video> = entries(&data)
            .into_iter()
            .take(max_results)
            .map(parse_video)
            .collect();

        info!("Fetched {} videos from playlist {}", videos.len(), playlist_id);
        Ok(videos)
    }

    async fn check_connection(&self) -> Result<()> {
        self.backend
            .extract("ytsearch1:test", &self.base_options().flat(), None)
            .await
            .map(|_| ())
            .map_err(|failure| {
                warn!("Provider validation failed: {}", failure);
                classify_failure(failure, None, YtSearchError::SearchProvider)
            })
    }
}
