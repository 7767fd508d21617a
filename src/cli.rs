//! Command-line arguments and URL collection.
//!
//! Every flag except `--file` can also be set through an environment
//! variable; the command line wins when both are given.

use std::path::{Path, PathBuf};

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use thiserror::Error;

use crate::downloader::DownloaderConfig;

/// Download YouTube Music playlists as MP3
#[derive(Parser, Debug)]
#[command(name = "ytm-playlist-dl", version, about)]
pub struct Cli {
    /// YouTube Music playlist URLs to download
    pub urls: Vec<String>,

    /// Directory to save downloaded files
    #[arg(short = 'o', long = "output-dir", env = "OUTPUT_DIR", default_value = "./downloads")]
    pub output_dir: PathBuf,

    /// MP3 audio quality
    #[arg(short = 'q', long = "quality", env = "MP3_QUALITY", default_value = "320k")]
    pub quality: String,

    /// Text file with playlist URLs (one per line, `#` starts a comment)
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Enable rate limiting to avoid IP blocking
    #[arg(
        short = 'r',
        long = "rate-limit",
        env = "RATE_LIMIT",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub rate_limit: bool,

    /// Attempts per playlist step when the network fails
    #[arg(
        long = "retries",
        env = "MAX_RETRIES",
        default_value_t = 3,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub retries: u32,

    /// Save logs to a file in addition to console output
    #[arg(long = "log-file", env = "LOG_FILE")]
    pub log_file: Option<String>,

    /// Enable verbose logging
    #[arg(
        short = 'v',
        long = "verbose",
        env = "VERBOSE",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub verbose: bool,
}

/// Input problems that stop the run before any download starts.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Error reading URL file {}: {source}", path.display())]
    UrlFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No playlist URLs provided. Use --help for usage information.")]
    NoUrls,
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl Cli {
    /// `LOG_FILE=""` means no log file.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(Path::new)
    }

    pub fn downloader_config(&self) -> DownloaderConfig {
        DownloaderConfig::default()
            .with_output_dir(&self.output_dir)
            .with_quality(&self.quality)
            .with_rate_limit(self.rate_limit)
            .with_max_retries(self.retries)
    }

    /// Positional URLs followed by those from `--file`.
    pub fn collect_urls(&self) -> Result<Vec<String>, CliError> {
        let mut urls = self.urls.clone();

        if let Some(path) = &self.file {
            let content = std::fs::read_to_string(path).map_err(|source| CliError::UrlFile {
                path: path.clone(),
                source,
            })?;
            urls.extend(parse_url_list(&content));
        }

        if urls.is_empty() {
            return Err(CliError::NoUrls);
        }
        Ok(urls)
    }
}

/// One URL per line; blank lines and `#` comments are skipped.
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
