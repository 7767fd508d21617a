pub mod cli;
pub mod downloader;
pub mod logging;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use cli::Cli;
use downloader::tools::{report_tools, ToolManager};
use downloader::{CliExtractor, Downloader};

/// Parse arguments, set up logging, and download every playlist.
///
/// Exits with status 1 only for problems found before the first download:
/// unreadable URL file, no URLs, no yt-dlp, or an unusable output root.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose, cli.log_file()) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let urls = match cli.collect_urls() {
        Ok(urls) => urls,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    let tools = ToolManager::new();
    report_tools(&tools);
    let command = match tools.resolve_ytdlp() {
        Ok(command) => command,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!("Running yt-dlp as: {}", command);

    let downloader = match Downloader::new(cli.downloader_config(), Arc::new(CliExtractor::new(command))) {
        Ok(downloader) => downloader,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(downloader.download_all(&urls));
    ExitCode::SUCCESS
}
