// Extraction options handed to yt-dlp for the download pass

use std::path::PathBuf;

use super::models::DownloaderConfig;

pub const SOCKET_TIMEOUT_SECS: u32 = 30;
pub const EXTRACTOR_RETRIES: u32 = 10;
pub const FRAGMENT_RETRIES: u32 = 10;

/// Post-processing steps, applied in order after the raw download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcessor {
    /// Transcode to `codec` at `quality` (ffmpeg)
    ExtractAudio { codec: String, quality: String },
    /// Write title/artist/album tags
    Metadata,
    /// Attach the thumbnail as cover art
    EmbedThumbnail,
}

#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    pub format: String,
    pub post_processors: Vec<PostProcessor>,
    /// yt-dlp output template, `%(field)s` placeholders included
    pub output_template: PathBuf,
    pub socket_timeout_secs: u32,
    pub retries: u32,
    pub fragment_retries: u32,
    pub skip_unavailable_fragments: bool,
    pub overwrites: bool,
    /// Skip unavailable entries instead of aborting the playlist
    pub ignore_errors: bool,
    pub geo_bypass: bool,
}

impl ExtractionOptions {
    /// Build options for one playlist. With a title, tracks land in
    /// `<output_dir>/<title>/<index> - <track>.<ext>`.
    pub fn build(config: &DownloaderConfig, playlist_title: Option<&str>) -> Self {
        let output_template = match playlist_title {
            Some(title) => config
                .output_dir
                .join(title)
                .join("%(playlist_index)s - %(title)s.%(ext)s"),
            None => config.output_dir.join("%(title)s.%(ext)s"),
        };

        Self {
            format: "bestaudio/best".to_string(),
            post_processors: vec![
                PostProcessor::ExtractAudio {
                    codec: "mp3".to_string(),
                    quality: config.quality.clone(),
                },
                PostProcessor::Metadata,
                PostProcessor::EmbedThumbnail,
            ],
            output_template,
            socket_timeout_secs: SOCKET_TIMEOUT_SECS,
            retries: EXTRACTOR_RETRIES,
            fragment_retries: FRAGMENT_RETRIES,
            skip_unavailable_fragments: true,
            overwrites: true,
            ignore_errors: true,
            geo_bypass: true,
        }
    }
}
