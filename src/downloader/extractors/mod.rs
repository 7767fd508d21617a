// Extractor implementations backed by yt-dlp

mod cli;
mod diagnostics;
mod progress;

pub use cli::CliExtractor;
pub use diagnostics::{diagnose_error, BlockingReason};
pub use progress::{parse_line, ProgressEvent};
