//! Typed yt-dlp option set, rendered to command-line arguments

use std::path::PathBuf;

/// Audio post-processing (`-x`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioExtraction {
    /// Target codec (`mp3`, `m4a`, ...)
    pub codec: String,
    /// Preferred quality: `0` for best VBR, otherwise a bitrate in kbps
    pub quality: Option<String>,
}

/// Options for one yt-dlp invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YtDlpOptions {
    /// Do not resolve playlist/search entries (`--flat-playlist`)
    pub flat: bool,
    /// Only dump metadata; when false the media is downloaded too
    pub skip_download: bool,
    /// Socket timeout in seconds
    pub socket_timeout: Option<u64>,
    /// Format selector (`-f`)
    pub format: Option<String>,
    pub merge_output_format: Option<String>,
    /// Output template (`-o`)
    pub output_template: Option<String>,
    pub extract_audio: Option<AudioExtraction>,
    pub ffmpeg_location: Option<PathBuf>,
    /// Playlist item range, e.g. `1:10`
    pub playlist_items: Option<String>,
    pub no_playlist: bool,
}

impl YtDlpOptions {
    /// Metadata-only options
    pub fn metadata(socket_timeout: u64) -> Self {
        Self {
            skip_download: true,
            socket_timeout: Some(socket_timeout),
            ..Self::default()
        }
    }

    pub fn flat(mut self) -> Self {
        self.flat = true;
        self
    }

    pub fn with_playlist_items(mut self, items: impl Into<String>) -> Self {
        self.playlist_items = Some(items.into());
        self
    }

    /// Command-line arguments, without the target URL
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["--no-warnings".to_string()];

        if self.skip_download {
            args.push("--dump-single-json".to_string());
        } else {
            // Print the final info JSON after downloading, with one progress line per update
            args.extend(
                ["--dump-single-json", "--no-simulate", "--newline", "--progress"]
                    .iter()
                    .map(|s| s.to_string()),
            );
        }

        if self.flat {
            args.push("--flat-playlist".to_string());
        }
        if self.no_playlist {
            args.push("--no-playlist".to_string());
        }
        if let Some(timeout) = self.socket_timeout {
            args.push("--socket-timeout".to_string());
            args.push(timeout.to_string());
        }
        if let Some(items) = &self.playlist_items {
            args.push("--playlist-items".to_string());
            args.push(items.clone());
        }
        if let Some(format) = &self.format {
            args.push("-f".to_string());
            args.push(format.clone());
        }
        if let Some(merge) = &self.merge_output_format {
            args.push("--merge-output-format".to_string());
            args.push(merge.clone());
        }
        if let Some(template) = &self.output_template {
            args.push("-o".to_string());
            args.push(template.clone());
        }
        if let Some(audio) = &self.extract_audio {
            args.push("-x".to_string());
            args.push("--audio-format".to_string());
            args.push(audio.codec.clone());
            if let Some(quality) = &audio.quality {
                args.push("--audio-quality".to_string());
                if quality == "0" {
                    args.push(quality.clone());
                } else {
                    args.push(format!("{}K", quality));
                }
            }
        }
        if let Some(ffmpeg) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".to_string());
            args.push(ffmpeg.to_string_lossy().to_string());
        }

        args
    }
}
