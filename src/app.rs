//! Application initialization and main entry point

use crate::backend::Services;
use crate::extractor::YtDlpCli;
use crate::server::McpServer;
use crate::utils::config::ServerSettings;
use crate::utils::platform::{ffmpeg_installation_guide, find_ffmpeg};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// yt-dlp runner; a missing binary surfaces later as `ytdlp_not_found` tool errors
fn ytdlp_backend() -> YtDlpCli {
    match YtDlpCli::new() {
        Ok(cli) => cli,
        Err(e) => {
            warn!("{}. Searches and downloads will fail until it is installed", e);
            YtDlpCli::with_path("yt-dlp")
        }
    }
}

/// Run the MCP server on stdio until the client disconnects
pub async fn run(settings: ServerSettings) -> Result<()> {
    info!(
        "Initializing {} v{}",
        settings.server_name, settings.server_version
    );
    info!("Download directory: {}", settings.download_dir);

    let server_name = settings.server_name.clone();
    let services = Arc::new(Services::from_backend(settings, Arc::new(ytdlp_backend())));
    services.initialize().await;

    let server = Arc::new(McpServer::new(services));
    info!("Starting MCP server {}", server_name);
    server.serve_stdio().await?;

    info!("MCP server stopped");
    Ok(())
}

/// Report on the external tools and the provider; true when everything works
pub async fn check(settings: ServerSettings) -> Result<bool> {
    let backend = ytdlp_backend();
    let mut healthy = true;

    match backend.version().await {
        Some(version) => println!("yt-dlp {} at {}", version, backend.ytdlp_path().display()),
        None => {
            healthy = false;
            println!("yt-dlp not found. Install it with: pip install yt-dlp");
        }
    }

    match find_ffmpeg() {
        Some(path) => println!("ffmpeg at {}", path.display()),
        None => {
            healthy = false;
            println!("{}", ffmpeg_installation_guide());
        }
    }

    let services = Services::from_backend(settings, Arc::new(backend));
    match services.provider().check_connection().await {
        Ok(()) => println!("Search provider: operational"),
        Err(e) => {
            healthy = false;
            println!("Search provider: error ({})", e);
        }
    }

    Ok(healthy)
}
