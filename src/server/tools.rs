//! MCP tool definitions and dispatch

use super::protocol::{Resource, Tool, ToolOutput};
use crate::backend::Services;
use crate::formatters::OutputFormat;
use crate::models::{
    DownloadParams, DownloadResult, DownloadType, Quality, SearchParams, SortBy, AUDIO_FORMATS,
    VIDEO_FORMATS,
};
use crate::utils::error::{Result, YtSearchError};
use crate::utils::validators::{validate_playlist_id, validate_query, validate_video_id};
use serde_json::{json, Value};
use tracing::{info, warn};

pub const CONFIG_RESOURCE: &str = "config://server";
pub const DOWNLOAD_OPTIONS_RESOURCE: &str = "info://download-options";

fn output_format_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["json", "markdown"],
        "description": "Output format"
    })
}

fn max_results_schema(default: usize, limit: usize) -> Value {
    json!({
        "type": "integer",
        "description": format!("Maximum number of results (1-{})", limit),
        "minimum": 1,
        "maximum": limit,
        "default": default
    })
}

fn video_id_schema() -> Value {
    json!({
        "type": "string",
        "description": "YouTube video ID (11 characters)"
    })
}

fn download_schema(formats: &[&str], default_format: &str, default_quality: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "video_id": video_id_schema(),
            "quality": {
                "type": "string",
                "enum": ["best", "high", "medium", "low"],
                "description": "Quality preset",
                "default": default_quality
            },
            "format": {
                "type": "string",
                "enum": formats,
                "description": "Output format",
                "default": default_format
            },
            "output_dir": {
                "type": "string",
                "description": "Directory to save into (defaults to the configured download directory)"
            },
            "filename": {
                "type": "string",
                "description": "Custom file name without extension"
            },
            "output_format": output_format_schema()
        },
        "required": ["video_id"]
    })
}

/// Get all available tools.
pub fn get_tools(services: &Services) -> Vec<Tool> {
    let settings = services.settings();
    let default_max = settings.default_max_results;
    let limit = settings.max_results_limit;

    vec![
        Tool {
            name: "search_videos".to_string(),
            description: "Search YouTube videos by keyword. \
                Returns titles, IDs, URLs, durations, view counts and uploaders."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query (1-200 characters)"
                    },
                    "max_results": max_results_schema(default_max, limit),
                    "sort_by": {
                        "type": "string",
                        "enum": ["relevance", "upload_date", "view_count", "rating"],
                        "description": "Result ordering",
                        "default": "relevance"
                    },
                    "output_format": output_format_schema()
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: "get_video_info".to_string(),
            description: "Get detailed information about a video: description, tags, \
                categories, statistics and age restriction."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "video_id": video_id_schema(),
                    "output_format": output_format_schema()
                },
                "required": ["video_id"]
            }),
        },
        Tool {
            name: "search_playlists".to_string(),
            description: "Search YouTube playlists by keyword.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query (1-200 characters)"
                    },
                    "max_results": max_results_schema(default_max, limit),
                    "output_format": output_format_schema()
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: "get_playlist_info".to_string(),
            description: "Get detailed information about a playlist.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "playlist_id": {
                        "type": "string",
                        "description": "YouTube playlist ID"
                    },
                    "output_format": output_format_schema()
                },
                "required": ["playlist_id"]
            }),
        },
        Tool {
            name: "get_playlist_videos".to_string(),
            description: "List the videos of a playlist.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "playlist_id": {
                        "type": "string",
                        "description": "YouTube playlist ID"
                    },
                    "max_results": max_results_schema(default_max, limit),
                    "output_format": output_format_schema()
                },
                "required": ["playlist_id"]
            }),
        },
        Tool {
            name: "download_video".to_string(),
            description: "Download a video. Requires FFmpeg for merging video and audio streams."
                .to_string(),
            input_schema: download_schema(
                VIDEO_FORMATS,
                &settings.default_video_format,
                &settings.default_video_quality,
            ),
        },
        Tool {
            name: "download_audio".to_string(),
            description: "Download the audio track of a video. Requires FFmpeg for conversion."
                .to_string(),
            input_schema: download_schema(
                AUDIO_FORMATS,
                &settings.default_audio_format,
                &settings.default_audio_quality,
            ),
        },
        Tool {
            name: "get_available_formats".to_string(),
            description: "List the formats available for downloading a video.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "video_id": video_id_schema(),
                    "output_format": output_format_schema()
                },
                "required": ["video_id"]
            }),
        },
        Tool {
            name: "validate_provider".to_string(),
            description: "Check that the search provider (yt-dlp) is working.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
    ]
}

/// Get all available resources.
pub fn get_resources() -> Vec<Resource> {
    vec![
        Resource {
            uri: CONFIG_RESOURCE.to_string(),
            name: "Server configuration".to_string(),
            description: "Effective server configuration".to_string(),
            mime_type: "application/json".to_string(),
        },
        Resource {
            uri: DOWNLOAD_OPTIONS_RESOURCE.to_string(),
            name: "Download options".to_string(),
            description: "Supported qualities and formats for downloads".to_string(),
            mime_type: "application/json".to_string(),
        },
    ]
}

/// Contents of a resource, or `None` for an unknown URI
pub fn read_resource(services: &Services, uri: &str) -> Option<Result<String>> {
    let value = match uri {
        CONFIG_RESOURCE => match serde_json::to_value(services.settings()) {
            Ok(value) => value,
            Err(e) => return Some(Err(e.into())),
        },
        DOWNLOAD_OPTIONS_RESOURCE => download_options(services),
        _ => return None,
    };
    Some(serde_json::to_string_pretty(&value).map_err(Into::into))
}

fn download_options(services: &Services) -> Value {
    let settings = services.settings();
    let qualities: Vec<&str> = Quality::ALL.iter().map(Quality::as_str).collect();

    json!({
        "video": {
            "qualities": qualities,
            "formats": VIDEO_FORMATS,
            "default_quality": settings.default_video_quality,
            "default_format": settings.default_video_format,
        },
        "audio": {
            "qualities": qualities,
            "formats": AUDIO_FORMATS,
            "default_quality": settings.default_audio_quality,
            "default_format": settings.default_audio_format,
        },
        "output_formats": ["json", "markdown"],
        "download_dir": settings.download_dir,
    })
}

/// Whether `name` is one of the registered tools
pub fn is_known_tool(name: &str) -> bool {
    matches!(
        name,
        "search_videos"
            | "get_video_info"
            | "search_playlists"
            | "get_playlist_info"
            | "get_playlist_videos"
            | "download_video"
            | "download_audio"
            | "get_available_formats"
            | "validate_provider"
    )
}

/// Run one tool. Failures are reported inside the output, never as protocol errors.
pub async fn call_tool(services: &Services, name: &str, args: &Value) -> ToolOutput {
    info!("Tool call: {}", name);

    let outcome = match name {
        "search_videos" => search_videos(services, args).await,
        "get_video_info" => get_video_info(services, args).await,
        "search_playlists" => search_playlists(services, args).await,
        "get_playlist_info" => get_playlist_info(services, args).await,
        "get_playlist_videos" => get_playlist_videos(services, args).await,
        "download_video" => download(services, args, DownloadType::Video).await,
        "download_audio" => download(services, args, DownloadType::Audio).await,
        "get_available_formats" => get_available_formats(services, args).await,
        "validate_provider" => validate_provider(services).await,
        other => Err(YtSearchError::Validation(format!("Unknown tool: {}", other))),
    };

    match outcome {
        Ok(text) => ToolOutput::text(text),
        Err(e) => {
            warn!("Tool {} failed: {}", name, e);
            ToolOutput::error(error_body(&e))
        }
    }
}

/// `{"error": ..., "error_type": ...}` body of a failed call
pub fn error_body(error: &YtSearchError) -> String {
    let body = json!({
        "error": error.to_string(),
        "error_type": error.kind(),
    });
    serde_json::to_string_pretty(&body).unwrap_or_else(|_| error.to_string())
}

fn str_arg<'a>(args: &'a Value, key: &str) -> Result<Option<&'a str>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(YtSearchError::Validation(format!("'{}' must be a string", key))),
    }
}

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    str_arg(args, key)?
        .ok_or_else(|| YtSearchError::Validation(format!("Missing required argument '{}'", key)))
}

fn max_results_arg(services: &Services, args: &Value) -> Result<usize> {
    let settings = services.settings();
    let max_results = match args.get("max_results") {
        None | Some(Value::Null) => settings.default_max_results,
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                YtSearchError::Validation("'max_results' must be a positive integer".to_string())
            })?,
    };

    if max_results == 0 || max_results > settings.max_results_limit {
        return Err(YtSearchError::Validation(format!(
            "max_results must be between 1 and {}",
            settings.max_results_limit
        )));
    }
    Ok(max_results)
}

fn output_format_arg(services: &Services, args: &Value) -> Result<OutputFormat> {
    Ok(str_arg(args, "output_format")?
        .map(OutputFormat::parse)
        .unwrap_or_else(|| services.default_output_format()))
}

fn video_id_arg<'a>(args: &'a Value) -> Result<&'a str> {
    let video_id = required_str(args, "video_id")?;
    if !validate_video_id(video_id) {
        return Err(YtSearchError::Validation(format!(
            "Invalid video ID '{}'. Video IDs are 11 characters of letters, digits, '_' or '-'",
            video_id
        )));
    }
    Ok(video_id)
}

fn playlist_id_arg<'a>(args: &'a Value) -> Result<&'a str> {
    let playlist_id = required_str(args, "playlist_id")?;
    if !validate_playlist_id(playlist_id) {
        return Err(YtSearchError::Validation(format!(
            "Invalid playlist ID '{}'",
            playlist_id
        )));
    }
    Ok(playlist_id)
}

async fn search_videos(services: &Services, args: &Value) -> Result<String> {
    let query = validate_query(str_arg(args, "query")?)?;
    let sort_by = match str_arg(args, "sort_by")? {
        Some(sort) => sort.parse::<SortBy>()?,
        None => SortBy::default(),
    };
    let params = SearchParams::new(&query)?
        .with_max_results(max_results_arg(services, args)?)?
        .with_sort(sort_by);
    let format = output_format_arg(services, args)?;

    let videos = services.provider().search(&params).await?;
    services.formatter(format).format_videos(&videos)
}

async fn get_video_info(services: &Services, args: &Value) -> Result<String> {
    let video_id = video_id_arg(args)?;
    let format = output_format_arg(services, args)?;

    let details = services.provider().get_video_details(video_id).await?;
    services.formatter(format).format_video_details(&details)
}

async fn search_playlists(services: &Services, args: &Value) -> Result<String> {
    let query = validate_query(str_arg(args, "query")?)?;
    let max_results = max_results_arg(services, args)?;
    let format = output_format_arg(services, args)?;

    let playlists = services.provider().search_playlists(&query, max_results).await?;
    services.formatter(format).format_playlists(&playlists)
}

async fn get_playlist_info(services: &Services, args: &Value) -> Result<String> {
    let playlist_id = playlist_id_arg(args)?;
    let format = output_format_arg(services, args)?;

    let details = services.provider().get_playlist_details(playlist_id).await?;
    services.formatter(format).format_playlist_details(&details)
}

async fn get_playlist_videos(services: &Services, args: &Value) -> Result<String> {
    let playlist_id = playlist_id_arg(args)?;
    let max_results = max_results_arg(services, args)?;
    let format = output_format_arg(services, args)?;

    let videos = services
        .provider()
        .get_playlist_videos(playlist_id, max_results)
        .await?;
    services.formatter(format).format_videos(&videos)
}

/// Request built from tool arguments, falling back to the configured defaults
fn download_params(services: &Services, args: &Value, kind: DownloadType) -> Result<DownloadParams> {
    let settings = services.settings();
    let video_id = video_id_arg(args)?;

    let (params, default_quality, default_format) = match kind {
        DownloadType::Video => (
            DownloadParams::new(video_id)?,
            settings.video_quality(),
            settings.default_video_format.as_str(),
        ),
        DownloadType::Audio => (
            DownloadParams::audio(video_id)?,
            settings.audio_quality(),
            settings.default_audio_format.as_str(),
        ),
    };

    let quality = match str_arg(args, "quality")? {
        Some(quality) => quality.to_lowercase().parse::<Quality>()?,
        None => default_quality,
    };
    let format = str_arg(args, "format")?.unwrap_or(default_format);

    let mut params = params.with_quality(quality).with_format(format)?;
    if let Some(dir) = str_arg(args, "output_dir")?.filter(|d| !d.trim().is_empty()) {
        params = params.with_output_dir(dir);
    }
    if let Some(filename) = str_arg(args, "filename")?.filter(|f| !f.trim().is_empty()) {
        params = params.with_filename(filename);
    }
    Ok(params)
}

async fn download(services: &Services, args: &Value, kind: DownloadType) -> Result<String> {
    let params = download_params(services, args, kind)?;
    let format = output_format_arg(services, args)?;

    let outcome = match kind {
        DownloadType::Video => services.downloader().download_video(&params).await,
        DownloadType::Audio => services.downloader().download_audio(&params).await,
    };

    let result = outcome.unwrap_or_else(|e| {
        warn!("Download of {} failed: {}", params.video_id, e);
        DownloadResult::failure(
            params.video_id.clone(),
            params.format.clone(),
            params.quality.as_str(),
            e.to_string(),
        )
    });
    services.formatter(format).format_download_result(&result)
}

async fn get_available_formats(services: &Services, args: &Value) -> Result<String> {
    let video_id = video_id_arg(args)?;
    let format = output_format_arg(services, args)?;

    let summary = services.downloader().get_available_formats(video_id).await?;
    services.formatter(format).format_formats(&summary)
}

async fn validate_provider(services: &Services) -> Result<String> {
    let body = match services.provider().check_connection().await {
        Ok(()) => json!({
            "valid": true,
            "provider": "yt-dlp",
            "status": "operational",
        }),
        Err(e) => json!({
            "valid": false,
            "provider": "yt-dlp",
            "status": "error",
            "error": e.to_string(),
        }),
    };
    Ok(serde_json::to_string_pretty(&body)?)
}
