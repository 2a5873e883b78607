//! yt-dlp subprocess backend
//!
//! Runs the yt-dlp executable with `--dump-single-json` and returns the info
//! dictionary it prints. Progress lines are forwarded to a
//! [`ProgressTracker`] while the process runs.

use crate::downloader::progress::ProgressTracker;
use crate::extractor::options::YtDlpOptions;
use crate::extractor::traits::{BackendFailure, MediaBackend};
use crate::utils::error::{Result, YtSearchError};
use crate::utils::platform::find_ytdlp;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command as AsyncCommand;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Metadata calls rarely take more than a few seconds
const DEFAULT_INFO_TIMEOUT: Duration = Duration::from_secs(120);

/// Downloads are capped at 30 minutes
const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(1800);

/// Backend driving the yt-dlp executable
#[derive(Debug, Clone)]
pub struct YtDlpCli {
    ytdlp_path: PathBuf,
    info_timeout: Duration,
    download_timeout: Duration,
}

impl YtDlpCli {
    /// Locate yt-dlp and build a backend for it
    ///
    /// Search order:
    /// 1. Bundled next to the executable
    /// 2. System PATH
    /// 3. Common installation paths
    pub fn new() -> Result<Self> {
        match find_ytdlp() {
            Some(path) => {
                info!("Found yt-dlp at: {}", path.display());
                Ok(Self::with_path(path))
            }
            None => {
                error!("yt-dlp not found anywhere!");
                Err(YtSearchError::YtDlpNotFound)
            }
        }
    }

    /// Backend for a yt-dlp executable at a known path
    pub fn with_path(ytdlp_path: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_path: ytdlp_path.into(),
            info_timeout: DEFAULT_INFO_TIMEOUT,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, info_timeout: Duration, download_timeout: Duration) -> Self {
        self.info_timeout = info_timeout;
        self.download_timeout = download_timeout;
        self
    }

    /// Get the path to yt-dlp being used
    pub fn ytdlp_path(&self) -> &Path {
        &self.ytdlp_path
    }

    /// `yt-dlp --version`, if it runs
    pub async fn version(&self) -> Option<String> {
        let output = AsyncCommand::new(&self.ytdlp_path)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .ok()?;

        if !output.status.success() {
            return None;
        }
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!version.is_empty()).then_some(version)
    }
}

#[async_trait]
impl MediaBackend for YtDlpCli {
    fn id(&self) -> &'static str {
        "yt-dlp"
    }

    async fn extract(
        &self,
        target: &str,
        options: &YtDlpOptions,
        progress: Option<&ProgressTracker>,
    ) -> std::result::Result<Value, BackendFailure> {
        let args = options.to_args();
        debug!("Running yt-dlp {:?} -- {}", args, target);

        let mut child = AsyncCommand::new(&self.ytdlp_path)
            .args(&args)
            .arg("--")
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BackendFailure::NotInstalled
                } else {
                    BackendFailure::Spawn(e)
                }
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let limit = if options.skip_download {
            self.info_timeout
        } else {
            self.download_timeout
        };

        let mut payload: Option<String> = None;
        let mut stderr_lines: Vec<String> = Vec::new();

        let run = async {
            // Drain both pipes together so neither can fill up and block the child
            tokio::join!(
                read_lines(stdout, |line| {
                    if line.trim_start().starts_with('{') {
                        payload = Some(line);
                    } else if let Some(tracker) = progress {
                        tracker.observe_line(&line);
                    }
                }),
                read_lines(stderr, |line| {
                    if let Some(tracker) = progress {
                        tracker.observe_line(&line);
                    }
                    stderr_lines.push(line);
                }),
            );
            child.wait().await
        };

        let outcome = timeout(limit, run).await;
        let status = match outcome {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => return Err(BackendFailure::Spawn(e)),
            Err(_) => {
                warn!("yt-dlp timed out after {}s for {}", limit.as_secs(), target);
                let _ = child.kill().await;
                return Err(BackendFailure::Timeout(limit));
            }
        };

        if !status.success() {
            let message = failure_message(&stderr_lines)
                .unwrap_or_else(|| format!("yt-dlp exited with {}", status));
            debug!("yt-dlp failed for {}: {}", target, message);
            return Err(BackendFailure::Failed { message });
        }

        let json = payload.ok_or_else(|| {
            BackendFailure::InvalidOutput("yt-dlp printed no JSON".to_string())
        })?;
        serde_json::from_str(&json).map_err(|e| BackendFailure::InvalidOutput(e.to_string()))
    }
}

async fn read_lines<R, F>(stream: Option<R>, mut on_line: F)
where
    R: AsyncRead + Unpin,
    F: FnMut(String),
{
    let Some(stream) = stream else {
        return;
    };
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                on_line(line.trim_end_matches(['\n', '\r']).to_string());
            }
        }
    }
}

/// The `ERROR:` lines yt-dlp printed, or all of stderr when there are none
fn failure_message(stderr_lines: &[String]) -> Option<String> {
    let errors: Vec<&str> = stderr_lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| line.starts_with("ERROR:"))
        .collect();

    let text = if errors.is_empty() {
        stderr_lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        errors.join("\n")
    };

    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_prefers_error_lines() {
        let lines = vec![
            "WARNING: something odd".to_string(),
            "ERROR: [youtube] abc: Private video".to_string(),
        ];
        assert_eq!(
            failure_message(&lines).unwrap(),
            "ERROR: [youtube] abc: Private video"
        );
    }

    #[test]
    fn test_failure_message_falls_back_to_stderr() {
        let lines = vec!["".to_string(), "Traceback: boom".to_string()];
        assert_eq!(failure_message(&lines).unwrap(), "Traceback: boom");
        assert!(failure_message(&[]).is_none());
    }

    #[tokio::test]
    async fn test_read_lines_decodes_invalid_utf8_lossily() {
        let input: &[u8] = b"caf\xe9\r\n{\"id\": \"x\"}\nlast";
        let mut lines = Vec::new();
        read_lines(Some(input), |line| lines.push(line)).await;
        assert_eq!(lines, vec!["caf\u{FFFD}", "{\"id\": \"x\"}", "last"]);
    }

    #[tokio::test]
    async fn test_missing_binary_is_not_installed() {
        let cli = YtDlpCli::with_path("/definitely/not/yt-dlp");
        let result = cli.extract("ytsearch1:test", &YtDlpOptions::metadata(5), None).await;
        assert!(matches!(result, Err(BackendFailure::NotInstalled)));
        assert!(cli.version().await.is_none());
    }

    // Scripts are exercised in one test so no other thread forks while a
    // script file is still open for writing.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_cli_against_scripted_binary() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let write_script = |name: &str, body: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        };

        // success with progress output
        let ok = write_script(
            "ok.sh",
            "echo '[download]  50.0% of 10.00MiB at 1.00MiB/s ETA 00:05'\n\
             echo '{\"id\": \"dQw4w9WgXcQ\", \"title\": \"Test\"}'",
        );
        let tracker = ProgressTracker::new("dQw4w9WgXcQ");
        let value = YtDlpCli::with_path(&ok)
            .extract("https://example.com", &YtDlpOptions::default(), Some(&tracker))
            .await
            .unwrap();
        assert_eq!(value["id"], "dQw4w9WgXcQ");
        assert_eq!(tracker.snapshot().total_bytes, 10 * 1024 * 1024);

        // a non-UTF-8 progress line does not hide the JSON after it
        let latin1 = write_script(
            "latin1.sh",
            "printf '[download] Destination: caf\\351.mp4\\n{\"id\": \"x\"}\\n'",
        );
        let tracker = ProgressTracker::new("x");
        let value = YtDlpCli::with_path(&latin1)
            .extract("x", &YtDlpOptions::default(), Some(&tracker))
            .await
            .unwrap();
        assert_eq!(value["id"], "x");
        assert_eq!(tracker.snapshot().filename.as_deref(), Some("caf\u{FFFD}.mp4"));

        // failure reports the ERROR line
        let failing = write_script("fail.sh", "echo 'ERROR: Private video' >&2\nexit 1");
        let err = YtDlpCli::with_path(&failing)
            .extract("x", &YtDlpOptions::metadata(5), None)
            .await
            .unwrap_err();
        match err {
            BackendFailure::Failed { message } => assert!(message.contains("Private video")),
            other => panic!("unexpected failure: {:?}", other),
        }

        // no JSON on success
        let silent = write_script("silent.sh", "exit 0");
        let err = YtDlpCli::with_path(&silent)
            .extract("x", &YtDlpOptions::metadata(5), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendFailure::InvalidOutput(_)));

        // hung process is killed
        let slow = write_script("slow.sh", "sleep 5");
        let err = YtDlpCli::with_path(&slow)
            .with_timeouts(Duration::from_millis(200), Duration::from_millis(200))
            .extract("x", &YtDlpOptions::metadata(5), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendFailure::Timeout(_)));
        assert!(err.to_string().contains("timed out"));

        let version = write_script("version.sh", "echo 2024.08.06");
        assert_eq!(
            YtDlpCli::with_path(&version).version().await.as_deref(),
            Some("2024.08.06")
        );
    }
}
