//! ytsearch-mcp - YouTube search and download tools for MCP clients
//!
//! Speaks the Model Context Protocol over stdio. Logs go to stderr so they
//! never mix with protocol messages on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use ytsearch_mcp::app;
use ytsearch_mcp::utils::config::{expand_path, ServerSettings};

#[derive(Parser)]
#[command(name = "ytsearch-mcp", version, about = "YouTube search MCP server backed by yt-dlp")]
struct Args {
    /// Directory downloads are saved to
    #[arg(long, env = "YT_MCP_DOWNLOAD_DIR")]
    download_dir: Option<String>,

    /// Log level (DEBUG, INFO, WARNING, ERROR)
    #[arg(long, env = "YT_MCP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Default output format for tool results (json or markdown)
    #[arg(long, env = "YT_MCP_DEFAULT_FORMAT")]
    default_format: Option<String>,

    /// Check yt-dlp, ffmpeg and the search provider, then exit
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = ServerSettings::from_env().context("Invalid configuration")?;
    if let Some(dir) = args.download_dir {
        settings.download_dir = expand_path(&dir, |key| std::env::var(key).ok());
    }
    if let Some(level) = args.log_level {
        settings.log_level = level.to_uppercase();
    }
    if let Some(format) = args.default_format {
        settings.default_format = format.to_lowercase();
    }

    // Initialize logging; stdout carries the protocol
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.tracing_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let rt = tokio::runtime::Runtime::new()?;

    if args.check {
        let healthy = rt.block_on(app::check(settings))?;
        if !healthy {
            std::process::exit(1);
        }
        return Ok(());
    }

    rt.block_on(app::run(settings))
}
