//! Typed records exchanged between the provider, downloader and formatters

pub mod download;
pub mod params;
pub mod playlist;
pub mod video;

pub use download::{DownloadResult, FormatEntry, FormatSummary};
pub use params::{
    DownloadParams, DownloadType, Quality, SearchParams, SortBy, AUDIO_FORMATS, DEFAULT_MAX_RESULTS,
    MAX_RESULTS_LIMIT, VIDEO_FORMATS,
};
pub use playlist::{playlist_url, Playlist, PlaylistDetails};
pub use video::{watch_url, Video, VideoDetails};
