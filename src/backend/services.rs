//! Wiring of provider, downloader and formatters from configuration

use crate::downloader::{Downloader, YtDlpDownloader};
use crate::extractor::MediaBackend;
use crate::formatters::{JsonFormatter, MarkdownFormatter, OutputFormat, ResultFormatter};
use crate::search::{SearchProvider, YtDlpSearchProvider};
use crate::utils::config::ServerSettings;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a tool call needs
pub struct Services {
    settings: ServerSettings,
    provider: Arc<dyn SearchProvider>,
    downloader: Arc<dyn Downloader>,
    json: JsonFormatter,
    markdown: MarkdownFormatter,
}

impl Services {
    pub fn new(
        settings: ServerSettings,
        provider: Arc<dyn SearchProvider>,
        downloader: Arc<dyn Downloader>,
    ) -> Self {
        Self {
            settings,
            provider,
            downloader,
            json: JsonFormatter::new(),
            markdown: MarkdownFormatter::new(),
        }
    }

    /// Build the yt-dlp provider and downloader over one backend
    pub fn from_backend(settings: ServerSettings, backend: Arc<dyn MediaBackend>) -> Self {
        let provider = YtDlpSearchProvider::new(backend.clone())
            .with_max_results_default(settings.default_max_results)
            .with_timeout(settings.search_timeout)
            .with_retries(settings.max_retries);

        let downloader = YtDlpDownloader::new(backend)
            .with_output_dir(&settings.download_dir)
            .with_min_disk_space(settings.min_disk_space_mb)
            .with_socket_timeout(settings.search_timeout);

        Self::new(settings, Arc::new(provider), Arc::new(downloader))
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    pub fn provider(&self) -> &dyn SearchProvider {
        self.provider.as_ref()
    }

    pub fn downloader(&self) -> &dyn Downloader {
        self.downloader.as_ref()
    }

    pub fn formatter(&self, format: OutputFormat) -> &dyn ResultFormatter {
        match format {
            OutputFormat::Json => &self.json,
            OutputFormat::Markdown => &self.markdown,
        }
    }

    /// Output format for calls that do not choose one
    pub fn default_output_format(&self) -> OutputFormat {
        OutputFormat::parse(&self.settings.default_format)
    }

    /// Check the provider once at start-up; the server runs either way.
    pub async fn initialize(&self) -> bool {
        let valid = self.provider.validate_connection().await;
        if valid {
            info!("Search provider validated");
        } else {
            warn!("Search provider validation failed; searches may not work");
        }
        valid
    }
}
