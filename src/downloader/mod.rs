// Downloader module - playlist orchestration around yt-dlp

pub mod errors;
pub mod extractors;
pub mod models;
pub mod options;
pub mod orchestrator;
pub mod processor;
pub mod rate_limit;
pub mod retry;
pub mod tools;
pub mod traits;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::DownloadError;
pub use extractors::CliExtractor;
pub use models::{BatchReport, DownloaderConfig, JobState, PlaylistInfo, PlaylistJob};
pub use options::{ExtractionOptions, PostProcessor};
pub use orchestrator::Downloader;
pub use processor::PlaylistProcessor;
pub use traits::PlaylistExtractor;
