// Error types for the playlist downloader

use std::path::PathBuf;

use thiserror::Error;

/// Substrings that mark an extractor failure as a transient network problem.
///
/// This is a textual heuristic over yt-dlp's human-readable messages, so it
/// can drift between yt-dlp releases.
pub const NETWORK_MARKERS: [&str; 6] = ["timeout", "connection", "network", "reset", "socket", "ssl"];

#[derive(Debug, Error)]
pub enum DownloadError {
    /// yt-dlp (or python with the yt_dlp module) is not installed
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// The extractor process could not be started or waited on
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// yt-dlp ran and reported a failure; carries its stderr
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Probe output was not the JSON we expected
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Output directory could not be created
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Whether the message looks like a transient network failure worth retrying.
    pub fn is_network(&self) -> bool {
        let lower = self.to_string().to_lowercase();
        NETWORK_MARKERS.iter().any(|marker| lower.contains(marker))
    }
}

// yt-dlp reports everything on stderr; map the text onto a variant
impl From<String> for DownloadError {
    fn from(s: String) -> Self {
        let lower = s.to_lowercase();

        if lower.contains("command not found") || lower.contains("no such file or directory") {
            return Self::ToolNotFound(s);
        }

        if lower.contains("no module named yt_dlp") {
            return Self::ToolNotFound(s);
        }

        if lower.contains("invalid json") || lower.contains("expected value") {
            return Self::ParseError(s);
        }

        Self::Extraction(s)
    }
}
