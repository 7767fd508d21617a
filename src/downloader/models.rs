// Common data models for the playlist downloader

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Title used when the probe does not report one.
pub const UNKNOWN_PLAYLIST_TITLE: &str = "Unknown_Playlist";

/// Run-wide downloader configuration
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// Root directory; each playlist gets its own subdirectory
    pub output_dir: PathBuf,
    /// MP3 quality passed to the audio extractor (e.g. "320k")
    pub quality: String,
    /// Sleep a random 1-5s after every playlist
    pub rate_limit: bool,
    /// Attempts per extractor call, including the first
    pub max_retries: u32,
    /// Base backoff; attempt `n` waits `retry_sleep * n`
    pub retry_sleep: Duration,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./downloads"),
            quality: "320k".to_string(),
            rate_limit: false,
            max_retries: 3,
            retry_sleep: Duration::from_secs(10),
        }
    }
}

impl DownloaderConfig {
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    pub fn with_rate_limit(mut self, enabled: bool) -> Self {
        self.rate_limit = enabled;
        self
    }

    /// At least one attempt is always made.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    pub fn with_retry_sleep(mut self, sleep: Duration) -> Self {
        self.retry_sleep = sleep;
        self
    }
}

/// One entry of a flat playlist probe. yt-dlp may emit `null` for
/// entries it could not resolve, hence the `Option` wrapper in [`PlaylistInfo`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Metadata-only probe result
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistInfo {
    pub title: Option<String>,
    #[serde(default)]
    pub entries: Option<Vec<Option<PlaylistEntry>>>,
}

impl PlaylistInfo {
    /// Number of entries reported, unresolved ones included
    pub fn entry_count(&self) -> usize {
        self.entries.as_ref().map_or(0, Vec::len)
    }

    /// Title with path separators replaced, or the placeholder when the
    /// title is missing or blank
    pub fn sanitized_title(&self) -> String {
        match self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(title) => sanitize_title(title),
            None => UNKNOWN_PLAYLIST_TITLE.to_string(),
        }
    }
}

/// Replace both path separators so a title can't escape its directory.
pub fn sanitize_title(title: &str) -> String {
    title.replace(['/', '\\'], "_")
}

/// Lifecycle of one playlist job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Pending,
    Probing,
    Empty,
    ProbeFailed,
    Probed,
    Downloading,
    Done,
    DownloadFailed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Empty | Self::ProbeFailed | Self::Done | Self::DownloadFailed
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Probing => "probing",
            Self::Empty => "empty",
            Self::ProbeFailed => "probe failed",
            Self::Probed => "probed",
            Self::Downloading => "downloading",
            Self::Done => "done",
            Self::DownloadFailed => "download failed",
        };
        f.write_str(s)
    }
}

/// State for one playlist URL while it is being processed
#[derive(Debug, Clone)]
pub struct PlaylistJob {
    pub url: String,
    pub title: Option<String>,
    pub entry_count: usize,
    pub output_dir: Option<PathBuf>,
    pub state: JobState,
}

impl PlaylistJob {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            entry_count: 0,
            output_dir: None,
            state: JobState::Pending,
        }
    }

    pub fn transition(&mut self, next: JobState) {
        tracing::debug!("Playlist {}: {} -> {}", self.url, self.state, next);
        self.state = next;
    }

    /// Record probe results and derive the per-playlist directory.
    pub fn resolve(&mut self, info: &PlaylistInfo, root: &Path) -> PathBuf {
        let title = info.sanitized_title();
        let dir = root.join(&title);
        self.output_dir = Some(dir.clone());
        self.title = Some(title);
        self.entry_count = info.entry_count();
        dir
    }
}

/// Outcome of a download call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Tracks that reached the audio extraction step
    pub tracks_completed: usize,
    /// Per-entry errors yt-dlp skipped past
    pub entry_errors: Vec<String>,
}

/// Totals for one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub done: usize,
    pub empty: usize,
    pub probe_failed: usize,
    pub download_failed: usize,
    /// Playlists that failed outside the probe/download steps
    pub aborted: usize,
}

impl BatchReport {
    pub fn record(&mut self, state: JobState) {
        match state {
            JobState::Done => self.done += 1,
            JobState::Empty => self.empty += 1,
            JobState::ProbeFailed => self.probe_failed += 1,
            JobState::DownloadFailed => self.download_failed += 1,
            _ => self.aborted += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.done + self.empty + self.probe_failed + self.download_failed + self.aborted
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} playlists: {} done, {} empty, {} probe failed, {} download failed, {} aborted",
            self.total(),
            self.done,
            self.empty,
            self.probe_failed,
            self.download_failed,
            self.aborted
        )
    }
}
