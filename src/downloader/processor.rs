// One playlist: probe, create its directory, download, pause

use std::sync::Arc;

use super::errors::DownloadError;
use super::extractors::diagnose_error;
use super::models::{DownloaderConfig, JobState, PlaylistJob};
use super::options::ExtractionOptions;
use super::rate_limit::RateLimiter;
use super::retry::RetryPolicy;
use super::traits::PlaylistExtractor;

pub struct PlaylistProcessor {
    config: DownloaderConfig,
    extractor: Arc<dyn PlaylistExtractor>,
    retry: RetryPolicy,
    rate_limiter: RateLimiter,
}

fn log_failure(context: &str, error: &DownloadError) {
    tracing::error!("{}: {}", context, error);
    if let Some(reason) = diagnose_error(&error.to_string()) {
        tracing::info!("Likely cause: {}", reason.hint());
    }
}

impl PlaylistProcessor {
    pub fn new(config: DownloaderConfig, extractor: Arc<dyn PlaylistExtractor>) -> Self {
        Self {
            retry: RetryPolicy::new(config.max_retries, config.retry_sleep),
            rate_limiter: RateLimiter::new(config.rate_limit),
            config,
            extractor,
        }
    }

    /// Process one playlist URL. Probe and download failures are logged and
    /// reflected in the returned job's state; only filesystem errors come
    /// back as `Err`. The rate-limit pause runs in every case.
    pub async fn process(&self, url: &str) -> Result<PlaylistJob, DownloadError> {
        let result = self.run_job(url).await;
        self.rate_limiter.pause().await;
        result
    }

    async fn run_job(&self, url: &str) -> Result<PlaylistJob, DownloadError> {
        tracing::info!("Downloading playlist: {}", url);
        let mut job = PlaylistJob::new(url);

        job.transition(JobState::Probing);
        let info = match self.retry.run(|| self.extractor.probe(url)).await {
            Ok(info) => info,
            Err(e) => {
                log_failure("Failed to fetch playlist info", &e);
                job.transition(JobState::ProbeFailed);
                return Ok(job);
            }
        };

        let playlist_dir = job.resolve(&info, &self.config.output_dir);
        let title = job.title.clone().unwrap_or_default();
        tracing::info!("Found playlist: {} with {} videos", title, job.entry_count);

        if job.entry_count == 0 {
            tracing::warn!("Playlist {} appears to be empty or inaccessible", url);
            job.transition(JobState::Empty);
            return Ok(job);
        }
        job.transition(JobState::Probed);

        tokio::fs::create_dir_all(&playlist_dir)
            .await
            .map_err(|source| DownloadError::CreateDir {
                path: playlist_dir.clone(),
                source,
            })?;

        let options = ExtractionOptions::build(&self.config, Some(title.as_str()));
        job.transition(JobState::Downloading);
        match self
            .retry
            .run(|| self.extractor.download(url, &options))
            .await
        {
            Ok(summary) => {
                if !summary.entry_errors.is_empty() {
                    tracing::warn!(
                        "{} track(s) in {} were skipped",
                        summary.entry_errors.len(),
                        title
                    );
                    for line in &summary.entry_errors {
                        tracing::debug!("{}", line);
                    }
                }
                tracing::info!(
                    "Download complete: {} track(s). Files saved to {}",
                    summary.tracks_completed,
                    playlist_dir.display()
                );
                job.transition(JobState::Done);
            }
            Err(e) => {
                log_failure(&format!("Error downloading playlist {}", url), &e);
                job.transition(JobState::DownloadFailed);
            }
        }

        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::DownloadSummary;
    use crate::downloader::testing::{playlist, FakeExtractor};
    use std::time::Duration;
    use tokio::time::Instant;

    const URL: &str = "https://music.youtube.com/playlist?list=PLa";

    fn config(root: &std::path::Path) -> DownloaderConfig {
        DownloaderConfig::default()
            .with_output_dir(root)
            .with_retry_sleep(Duration::from_secs(1))
    }

    #[tokio::test(start_paused = true)]
    async fn test_title_with_separator_is_sanitized_before_mkdir() {
        let root = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeExtractor::new().on_probe(URL, Ok(playlist("My/Mix", 3))));
        let processor = PlaylistProcessor::new(config(root.path()), fake.clone());

        let job = processor.process(URL).await.unwrap();

        assert_eq!(job.state, JobState::Done);
        assert!(job.state.is_terminal());
        assert!(root.path().join("My_Mix").is_dir());
        assert!(!root.path().join("My").exists());

        let calls = fake.download_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1.starts_with(root.path().join("My_Mix")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_playlist_creates_nothing() {
        let root = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeExtractor::new().on_probe(URL, Ok(playlist("Nothing", 0))));
        let processor = PlaylistProcessor::new(config(root.path()), fake.clone());

        let job = processor.process(URL).await.unwrap();

        assert_eq!(job.state, JobState::Empty);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
        assert_eq!(fake.download_count(URL), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_probe_error_exhausts_retries() {
        let root = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeExtractor::new().on_probe(
            URL,
            Err(DownloadError::Extraction("Unable to download API page: Connection reset by peer".to_string())),
        ));
        let processor = PlaylistProcessor::new(config(root.path()).with_max_retries(4), fake.clone());

        let job = processor.process(URL).await.unwrap();

        assert_eq!(job.state, JobState::ProbeFailed);
        assert_eq!(fake.probe_count(URL), 4);
        assert_eq!(fake.download_count(URL), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_network_probe_error_is_not_retried() {
        let root = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeExtractor::new().on_probe(
            URL,
            Err(DownloadError::Extraction("This playlist is private".to_string())),
        ));
        let processor = PlaylistProcessor::new(config(root.path()), fake.clone());

        let job = processor.process(URL).await.unwrap();

        assert_eq!(job.state, JobState::ProbeFailed);
        assert_eq!(fake.probe_count(URL), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_failure_is_contained() {
        let root = tempfile::tempdir().unwrap();
        let fake = Arc::new(
            FakeExtractor::new()
                .on_probe(URL, Ok(playlist("Mix", 2)))
                .on_download(URL, Err(DownloadError::Extraction("Requested format is not available".to_string()))),
        );
        let processor = PlaylistProcessor::new(config(root.path()), fake.clone());

        let job = processor.process(URL).await.unwrap();

        assert_eq!(job.state, JobState::DownloadFailed);
        assert_eq!(fake.download_count(URL), 1);
        assert!(root.path().join("Mix").is_dir());
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_download_still_done() {
        let root = tempfile::tempdir().unwrap();
        let summary = DownloadSummary {
            tracks_completed: 1,
            entry_errors: vec!["ERROR: [youtube] b: Video unavailable".to_string()],
        };
        let fake = Arc::new(
            FakeExtractor::new()
                .on_probe(URL, Ok(playlist("Mix", 2)))
                .on_download(URL, Ok(summary)),
        );
        let processor = PlaylistProcessor::new(config(root.path()), fake);

        let job = processor.process(URL).await.unwrap();
        assert_eq!(job.state, JobState::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_applies_after_failure() {
        let root = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeExtractor::new().on_probe(
            URL,
            Err(DownloadError::Extraction("This playlist is private".to_string())),
        ));
        let processor = PlaylistProcessor::new(config(root.path()).with_rate_limit(true), fake);

        let started = Instant::now();
        processor.process(URL).await.unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_title_uses_placeholder() {
        let root = tempfile::tempdir().unwrap();
        let mut info = playlist("unused", 1);
        info.title = None;
        let fake = Arc::new(FakeExtractor::new().on_probe(URL, Ok(info)));
        let processor = PlaylistProcessor::new(config(root.path()), fake);

        processor.process(URL).await.unwrap();
        assert!(root.path().join("Unknown_Playlist").is_dir());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_title_nests_under_placeholder() {
        let root = tempfile::tempdir().unwrap();
        let fake = Arc::new(FakeExtractor::new().on_probe(URL, Ok(playlist("", 2))));
        let processor = PlaylistProcessor::new(config(root.path()), fake.clone());

        let job = processor.process(URL).await.unwrap();

        assert_eq!(job.state, JobState::Done);
        let expected = root.path().join("Unknown_Playlist");
        assert!(expected.is_dir());
        let calls = fake.download_calls.lock().unwrap();
        assert!(calls[0].1.starts_with(&expected));
    }
}
