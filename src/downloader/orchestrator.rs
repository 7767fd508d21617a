// Batch driver: playlists one after another, failures isolated per playlist

use std::sync::Arc;

use super::errors::DownloadError;
use super::models::{BatchReport, DownloaderConfig};
use super::processor::PlaylistProcessor;
use super::traits::PlaylistExtractor;

pub struct Downloader {
    processor: PlaylistProcessor,
}

impl Downloader {
    /// Create the downloader, making sure the output root exists.
    pub fn new(
        config: DownloaderConfig,
        extractor: Arc<dyn PlaylistExtractor>,
    ) -> Result<Self, DownloadError> {
        std::fs::create_dir_all(&config.output_dir).map_err(|source| DownloadError::CreateDir {
            path: config.output_dir.clone(),
            source,
        })?;
        tracing::debug!("Using extractor: {}", extractor.name());

        Ok(Self {
            processor: PlaylistProcessor::new(config, extractor),
        })
    }

    /// Download every playlist in order. Never stops early.
    pub async fn download_all(&self, urls: &[String]) -> BatchReport {
        let total = urls.len();
        let mut report = BatchReport::default();

        for (i, url) in urls.iter().enumerate() {
            tracing::info!("Processing playlist {}/{}: {}", i + 1, total, url);
            match self.processor.process(url).await {
                Ok(job) => report.record(job.state),
                Err(e) => {
                    tracing::error!("Failed to download playlist {}: {}", url, e);
                    report.aborted += 1;
                }
            }
        }

        tracing::info!("Finished {}", report);
        report
    }
}
