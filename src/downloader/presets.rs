//! Quality presets mapped to yt-dlp format selectors

use crate::extractor::AudioExtraction;
use crate::models::Quality;

/// Formats stored without lossy compression
const LOSSLESS_AUDIO: &[&str] = &["wav", "flac"];

/// Format selector for a video download
pub fn video_format_selector(quality: Quality) -> &'static str {
    match quality {
        Quality::Best => "bestvideo+bestaudio/best",
        Quality::High => "bestvideo[height<=1080]+bestaudio/best[height<=1080]",
        Quality::Medium => "bestvideo[height<=720]+bestaudio/best[height<=720]",
        Quality::Low => "bestvideo[height<=480]+bestaudio/best[height<=480]",
    }
}

/// Format selector for an audio-only download
pub fn audio_format_selector(quality: Quality) -> &'static str {
    match quality {
        Quality::Best => "bestaudio/best",
        Quality::High => "bestaudio[abr>=160]/bestaudio/best",
        Quality::Medium => "bestaudio[abr>=128]/bestaudio/best",
        Quality::Low => "worstaudio[abr>=64]/worstaudio/bestaudio",
    }
}

/// Preferred audio quality: `0` is the best VBR setting, otherwise kbps
pub fn audio_bitrate(quality: Quality) -> &'static str {
    match quality {
        Quality::Best => "0",
        Quality::High => "192",
        Quality::Medium => "128",
        Quality::Low => "96",
    }
}

pub fn is_lossless(codec: &str) -> bool {
    LOSSLESS_AUDIO.contains(&codec)
}

/// Audio extraction post-processing for `codec` at `quality`
pub fn audio_extraction(codec: &str, quality: Quality) -> AudioExtraction {
    let quality = if is_lossless(codec) {
        None
    } else {
        Some(audio_bitrate(quality).to_string())
    };

    AudioExtraction {
        codec: codec.to_string(),
        quality,
    }
}
