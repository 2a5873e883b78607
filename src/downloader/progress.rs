//! Progress tracking for downloads

use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error, info};

/// One progress notification from yt-dlp
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Downloading {
        percent: f64,
        total_bytes: u64,
        /// bytes per second
        speed: f64,
        eta: Option<Duration>,
    },
    /// yt-dlp started writing `filename`
    Destination { filename: String },
    /// A file (or the merged/converted output) is complete
    Finished { filename: String },
    Error { message: String },
}

/// Download status
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DownloadStatus {
    #[default]
    Initializing,
    Downloading,
    Finished,
    Failed(String),
}

/// Progress tracking structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadProgress {
    pub total_bytes: u64,
    pub downloaded_bytes: u64,
    pub speed: f64, // bytes per second
    pub eta: Option<Duration>,
    pub status: DownloadStatus,
    pub filename: Option<String>,
}

impl DownloadProgress {
    /// Update progress with new data
    pub fn update(&mut self, downloaded_bytes: u64, speed: f64) {
        self.downloaded_bytes = downloaded_bytes;
        self.speed = speed;

        // Calculate ETA if we have a speed
        if speed > 0.0 && self.downloaded_bytes < self.total_bytes {
            let remaining = self.total_bytes - self.downloaded_bytes;
            self.eta = Some(Duration::from_secs_f64((remaining as f64) / speed));
        } else if self.total_bytes > 0 && self.downloaded_bytes >= self.total_bytes {
            self.eta = Some(Duration::from_secs(0));
        } else {
            self.eta = None;
        }
    }

    /// Get progress percentage (0.0 to 1.0)
    pub fn percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.downloaded_bytes as f64 / self.total_bytes as f64
    }
}

type ProgressCallback = Box<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Tracks the progress of one download
pub struct ProgressTracker {
    video_id: String,
    state: Mutex<DownloadProgress>,
    callback: Option<ProgressCallback>,
}

impl ProgressTracker {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            state: Mutex::new(DownloadProgress::default()),
            callback: None,
        }
    }

    /// Tracker that also forwards every event to `callback`
    pub fn with_callback<F>(video_id: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&ProgressEvent) + Send + Sync + 'static,
    {
        Self {
            callback: Some(Box::new(callback)),
            ..Self::new(video_id)
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Apply one event
    pub fn hook(&self, event: &ProgressEvent) {
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            match event {
                ProgressEvent::Downloading {
                    percent,
                    total_bytes,
                    speed,
                    eta,
                } => {
                    state.status = DownloadStatus::Downloading;
                    if *total_bytes > 0 {
                        state.total_bytes = *total_bytes;
                    }
                    let downloaded = (percent / 100.0 * state.total_bytes as f64) as u64;
                    state.update(downloaded, *speed);
                    if eta.is_some() {
                        state.eta = *eta;
                    }
                    debug!(
                        "[{}] {:.1}% of {} bytes at {:.0} B/s",
                        self.video_id, percent, state.total_bytes, speed
                    );
                }
                ProgressEvent::Destination { filename } => {
                    state.filename = Some(filename.clone());
                }
                ProgressEvent::Finished { filename } => {
                    state.status = DownloadStatus::Finished;
                    state.filename = Some(filename.clone());
                    info!("[{}] Download finished: {}", self.video_id, filename);
                }
                ProgressEvent::Error { message } => {
                    state.status = DownloadStatus::Failed(message.clone());
                    error!("[{}] Download error: {}", self.video_id, message);
                }
            }
        }

        if let Some(callback) = &self.callback {
            callback(event);
        }
    }

    /// Parse one line of yt-dlp output and apply it; returns whether it was a progress line
    pub fn observe_line(&self, line: &str) -> bool {
        match parse_progress_line(line) {
            Some(event) => {
                self.hook(&event);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> DownloadProgress {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("video_id", &self.video_id)
            .field("state", &self.snapshot())
            .finish()
    }
}

/// Recognize yt-dlp progress output
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let line = line.trim();

    if let Some(message) = line.strip_prefix("ERROR:") {
        return Some(ProgressEvent::Error {
            message: message.trim().to_string(),
        });
    }

    if let Some(rest) = line.strip_prefix("[download] Destination:") {
        return Some(ProgressEvent::Destination {
            filename: rest.trim().to_string(),
        });
    }

    if let Some(rest) = line.strip_prefix("[Merger] Merging formats into ") {
        return Some(ProgressEvent::Finished {
            filename: rest.trim().trim_matches('"').to_string(),
        });
    }

    if let Some(rest) = line.strip_prefix("[ExtractAudio] Destination:") {
        return Some(ProgressEvent::Finished {
            filename: rest.trim().to_string(),
        });
    }

    if let Some(rest) = line.strip_prefix("[download] ") {
        if let Some(filename) = rest.strip_suffix(" has already been downloaded") {
            return Some(ProgressEvent::Finished {
                filename: filename.trim().to_string(),
            });
        }
        if let Some((percent, speed, total_bytes)) = parse_percent_line(rest) {
            return Some(ProgressEvent::Downloading {
                percent,
                total_bytes,
                speed,
                eta: parse_eta(rest),
            });
        }
    }

    None
}

/// `42.5% of ~ 150.00MiB at  5.20MiB/s ETA 00:15` → (percent, bytes/s, total bytes)
fn parse_percent_line(line: &str) -> Option<(f64, f64, u64)> {
    // 1. Parse Percentage
    let pct_pos = line.find('%')?;
    let pct = line[..pct_pos].trim().parse::<f64>().ok()?;

    // 2. Parse Total Size (look for "of " or "of ~ ")
    let mut total_bytes = 0;
    if let Some(of_idx) = line.find(" of ") {
        let after_of = line[of_idx + 4..].trim_start();
        let after_of = after_of.strip_prefix('~').unwrap_or(after_of);

        // Size ends before " at " or " in "
        let size_end = [after_of.find(" at "), after_of.find(" in ")]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(after_of.len());
        if let Some(bytes) = parse_size(after_of[..size_end].trim()) {
            total_bytes = bytes as u64;
        }
    }

    // 3. Parse Speed (look for ' at ' and '/s')
    let mut speed_bps = 0.0;
    if let Some(at_idx) = line.find(" at ") {
        let after = &line[at_idx + 4..];
        if let Some(slash_idx) = after.find("/s") {
            speed_bps = parse_size(after[..slash_idx].trim()).unwrap_or(0.0);
        }
    }

    Some((pct, speed_bps, total_bytes))
}

/// `5.20MiB` → bytes
fn parse_size(token: &str) -> Option<f64> {
    let idx = token
        .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
        .unwrap_or(token.len());
    if idx == 0 {
        return None;
    }

    let num = token[..idx].parse::<f64>().ok()?;
    let multiplier = match token[idx..].trim() {
        "KiB" => 1024.0,
        "MiB" => 1024.0 * 1024.0,
        "GiB" => 1024.0 * 1024.0 * 1024.0,
        "KB" => 1000.0,
        "MB" => 1000.0 * 1000.0,
        "GB" => 1000.0 * 1000.0 * 1000.0,
        _ => 1.0,
    };
    Some(num * multiplier)
}

/// `ETA 01:02:03` / `ETA 00:15`
fn parse_eta(line: &str) -> Option<Duration> {
    let idx = line.find("ETA ")?;
    let token = line[idx + 4..].split_whitespace().next()?;

    let mut secs = 0u64;
    for part in token.split(':') {
        secs = secs * 60 + part.parse::<u64>().ok()?;
    }
    Some(Duration::from_secs(secs))
}
