// Random pause between playlists to avoid IP blocking

use std::time::Duration;

use rand::Rng;

const MIN_DELAY_SECS: f64 = 1.0;
const MAX_DELAY_SECS: f64 = 5.0;

#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    enabled: bool,
}

impl RateLimiter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Sleep for a uniform random delay in [1.0, 5.0) seconds when enabled.
    /// Returns the delay slept, if any.
    pub async fn pause(&self) -> Option<Duration> {
        if !self.enabled {
            return None;
        }

        let secs = rand::thread_rng().gen_range(MIN_DELAY_SECS..MAX_DELAY_SECS);
        let delay = Duration::from_secs_f64(secs);
        tracing::debug!("Rate limiting: sleeping for {:.2} seconds", secs);
        tokio::time::sleep(delay).await;
        Some(delay)
    }
}
