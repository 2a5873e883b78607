//! Server configuration
//!
//! Values start from [`ServerSettings::default`] and are overridden by
//! `YT_MCP_*` environment variables, then by command-line flags in `main`.

use crate::models::{Quality, AUDIO_FORMATS, MAX_RESULTS_LIMIT, VIDEO_FORMATS};
use crate::utils::error::{Result, YtSearchError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Prefix shared by every environment variable the server reads
pub const ENV_PREFIX: &str = "YT_MCP_";

/// Server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Name reported in the MCP `initialize` handshake
    pub server_name: String,

    /// Version reported in the MCP `initialize` handshake
    pub server_version: String,

    /// Results returned by searches when the caller does not ask for a count
    pub default_max_results: usize,

    /// Upper bound accepted for `max_results`
    pub max_results_limit: usize,

    /// Socket timeout handed to yt-dlp (seconds)
    pub search_timeout: u64,

    /// Attempts for network-failing searches
    pub max_retries: u32,

    /// Download location (already expanded)
    pub download_dir: String,

    pub default_video_quality: String,
    pub default_audio_quality: String,
    pub default_video_format: String,
    pub default_audio_format: String,

    /// Free space required before a download starts (MB)
    pub min_disk_space_mb: u64,

    pub log_level: String,

    /// Output format used when a tool call does not name one
    pub default_format: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        let metadata = package_metadata();
        Self {
            server_name: metadata.name.to_string(),
            server_version: metadata.version.to_string(),
            default_max_results: 10,
            max_results_limit: 50,
            search_timeout: 30,
            max_retries: 3,
            download_dir: "downloads".to_string(),
            default_video_quality: "high".to_string(),
            default_audio_quality: "high".to_string(),
            default_video_format: "mp4".to_string(),
            default_audio_format: "mp3".to_string(),
            min_disk_space_mb: 100,
            log_level: "INFO".to_string(),
            default_format: "json".to_string(),
        }
    }
}

impl ServerSettings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    ///
    /// `lookup` receives full variable names (`YT_MCP_DOWNLOAD_DIR`, ...) and is
    /// also used to expand `$VAR` references inside `download_dir`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(v) = var("SERVER_NAME") {
            settings.server_name = v;
        }
        if let Some(v) = var("DEFAULT_MAX_RESULTS") {
            settings.default_max_results = parse_number("DEFAULT_MAX_RESULTS", &v)?;
        }
        if let Some(v) = var("MAX_RESULTS_LIMIT") {
            settings.max_results_limit = parse_number("MAX_RESULTS_LIMIT", &v)?;
        }
        if let Some(v) = var("SEARCH_TIMEOUT") {
            settings.search_timeout = parse_number("SEARCH_TIMEOUT", &v)?;
        }
        if let Some(v) = var("MAX_RETRIES") {
            settings.max_retries = parse_number("MAX_RETRIES", &v)?;
        }
        if let Some(v) = var("DOWNLOAD_DIR") {
            settings.download_dir = v;
        }
        if let Some(v) = var("DEFAULT_VIDEO_QUALITY") {
            settings.default_video_quality = v.to_lowercase();
        }
        if let Some(v) = var("DEFAULT_AUDIO_QUALITY") {
            settings.default_audio_quality = v.to_lowercase();
        }
        if let Some(v) = var("DEFAULT_VIDEO_FORMAT") {
            settings.default_video_format = v.to_lowercase();
        }
        if let Some(v) = var("DEFAULT_AUDIO_FORMAT") {
            settings.default_audio_format = v.to_lowercase();
        }
        if let Some(v) = var("MIN_DISK_SPACE_MB") {
            settings.min_disk_space_mb = parse_number("MIN_DISK_SPACE_MB", &v)?;
        }
        if let Some(v) = var("LOG_LEVEL") {
            settings.log_level = v.to_uppercase();
        }
        if let Some(v) = var("DEFAULT_FORMAT") {
            settings.default_format = v.to_lowercase();
        }

        settings.download_dir = expand_path(&settings.download_dir, &lookup);
        settings.validate()?;
        Ok(settings)
    }

    /// Enforce sane bounds on the numeric settings
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_RESULTS_LIMIT).contains(&self.max_results_limit) {
            return Err(YtSearchError::Config(format!(
                "max_results_limit must be between 1 and {}",
                MAX_RESULTS_LIMIT
            )));
        }
        if self.default_max_results == 0 || self.default_max_results > self.max_results_limit {
            return Err(YtSearchError::Config(format!(
                "default_max_results must be between 1 and {}",
                self.max_results_limit
            )));
        }
        if self.search_timeout == 0 {
            return Err(YtSearchError::Config(
                "search_timeout must be positive".to_string(),
            ));
        }
        for (name, value) in [
            ("default_video_quality", &self.default_video_quality),
            ("default_audio_quality", &self.default_audio_quality),
        ] {
            if value.parse::<Quality>().is_err() {
                return Err(YtSearchError::Config(format!(
                    "{} must be one of best, high, medium, low, got {:?}",
                    name, value
                )));
            }
        }
        check_format("default_video_format", &self.default_video_format, VIDEO_FORMATS)?;
        check_format("default_audio_format", &self.default_audio_format, AUDIO_FORMATS)?;
        Ok(())
    }

    pub fn video_quality(&self) -> Quality {
        self.default_video_quality.parse().unwrap_or_default()
    }

    pub fn audio_quality(&self) -> Quality {
        self.default_audio_quality.parse().unwrap_or_default()
    }

    /// `tracing` filter directive matching `log_level`
    pub fn tracing_directive(&self) -> &'static str {
        match self.log_level.to_uppercase().as_str() {
            "TRACE" => "trace",
            "DEBUG" => "debug",
            "WARNING" | "WARN" => "warn",
            "ERROR" | "CRITICAL" => "error",
            _ => "info",
        }
    }
}

fn check_format(name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(YtSearchError::Config(format!(
            "{} must be one of {}, got {:?}",
            name,
            allowed.join(", "),
            value
        )))
    }
}

fn parse_number<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim().parse::<T>().map_err(|_| {
        YtSearchError::Config(format!(
            "{}{} must be a non-negative integer, got {:?}",
            ENV_PREFIX, name, raw
        ))
    })
}

/// Expand a leading `~` and `$VAR` / `${VAR}` references.
///
/// Unknown variables are left untouched.
pub fn expand_path<F>(raw: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if raw.is_empty() {
        return String::new();
    }

    let with_home = if raw == "~" || raw.starts_with("~/") || raw.starts_with("~\\") {
        match dirs::home_dir() {
            Some(home) => format!("{}{}", home.display(), &raw[1..]),
            None => raw.to_string(),
        }
    } else {
        raw.to_string()
    };

    let mut out = String::with_capacity(with_home.len());
    let mut rest = with_home.as_str();

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        match (name.is_empty(), lookup(name)) {
            (false, Some(value)) => out.push_str(&value),
            _ => out.push_str(&rest[pos..pos + 1 + consumed]),
        }
        rest = &after[consumed..];
    }
    out.push_str(rest);
    out
}

/// Name and version of this package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: &'static str,
    pub version: &'static str,
}

/// Package metadata baked in at compile time
pub fn package_metadata() -> PackageMetadata {
    PackageMetadata {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    }
}
