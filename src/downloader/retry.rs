// Coarse retry around extractor calls

use std::future::Future;
use std::time::Duration;

use super::errors::DownloadError;

/// Linear-backoff retry for network-classified errors.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_retries: u32,
    retry_sleep: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_sleep: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            retry_sleep,
        }
    }

    /// Run `op` up to `max_retries` times. Errors not classified as network
    /// failures are returned straight away; after the last network failure
    /// that error is returned.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, DownloadError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DownloadError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_network() => {
                    tracing::warn!(
                        "Network error (attempt {}/{}): {}",
                        attempt,
                        self.max_retries,
                        e
                    );
                    if attempt >= self.max_retries {
                        return Err(e);
                    }
                    tokio::time::sleep(self.retry_sleep * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
