// Extractor trait definition

use async_trait::async_trait;

use super::errors::DownloadError;
use super::models::{DownloadSummary, PlaylistInfo};
use super::options::ExtractionOptions;

/// Something that can enumerate a playlist and download it.
#[async_trait]
pub trait PlaylistExtractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// Metadata-only probe: playlist title and entries, no media fetched
    async fn probe(&self, url: &str) -> Result<PlaylistInfo, DownloadError>;

    /// Download and post-process every entry of the playlist at `url`
    async fn download(
        &self,
        url: &str,
        options: &ExtractionOptions,
    ) -> Result<DownloadSummary, DownloadError>;
}
