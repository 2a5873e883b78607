//! Scripted media backend shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use ytsearch_mcp::downloader::ProgressTracker;
use ytsearch_mcp::extractor::{BackendFailure, MediaBackend, YtDlpOptions};

/// One recorded backend invocation
#[derive(Debug, Clone)]
pub struct Call {
    pub target: String,
    pub options: YtDlpOptions,
}

/// Answers calls from a queue of scripted outcomes, in order
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<Value, BackendFailure>>>,
    progress_lines: Vec<String>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, value: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(value));
        self
    }

    /// Fail like a non-zero yt-dlp exit with `message` on stderr
    pub fn fail(self, message: &str) -> Self {
        self.fail_with(BackendFailure::Failed {
            message: message.to_string(),
        })
    }

    pub fn fail_with(self, failure: BackendFailure) -> Self {
        self.responses.lock().unwrap().push_back(Err(failure));
        self
    }

    /// Lines fed to the progress tracker of every download call
    pub fn with_progress_lines(mut self, lines: &[&str]) -> Self {
        self.progress_lines = lines.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaBackend for ScriptedBackend {
    fn id(&self) -> &'static str {
        "scripted"
    }

    async fn extract(
        &self,
        target: &str,
        options: &YtDlpOptions,
        progress: Option<&ProgressTracker>,
    ) -> Result<Value, BackendFailure> {
        self.calls.lock().unwrap().push(Call {
            target: target.to_string(),
            options: options.clone(),
        });

        if let Some(tracker) = progress {
            for line in &self.progress_lines {
                tracker.observe_line(line);
            }
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(BackendFailure::Failed {
                    message: "no scripted response left".to_string(),
                })
            })
    }
}

pub fn video_entry(id: &str, title: &str, views: u64) -> Value {
    json!({
        "_type": "url",
        "ie_key": "Youtube",
        "id": id,
        "title": title,
        "url": format!("https://www.youtube.com/watch?v={}", id),
        "duration": 212.0,
        "view_count": views,
        "channel": "Channel",
        "thumbnails": [
            {"url": "https://i.ytimg.com/vi/small.jpg"},
            {"url": "https://i.ytimg.com/vi/large.jpg"}
        ]
    })
}

pub fn playlist_entry(id: &str, title: &str) -> Value {
    json!({
        "_type": "url",
        "ie_key": "YoutubeTab",
        "id": id,
        "title": title,
        "url": format!("https://www.youtube.com/playlist?list={}", id),
        "playlist_count": 12
    })
}
