//! Utility modules for errors, configuration, validation and the filesystem

pub mod config;
pub mod error;
pub mod fs;
pub mod platform;
pub mod validators;

// Re-export for convenience
pub use config::ServerSettings;
pub use error::{Result, YtSearchError};
pub use validators::{sanitize_filename, validate_playlist_id, validate_query, validate_video_id};
