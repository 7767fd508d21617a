// yt-dlp command-line extractor
//
// Probe: `--flat-playlist --dump-single-json` lists entries without resolving
// media. Download: the options are rendered as flags and stdout is streamed
// for progress. ffmpeg is driven by yt-dlp itself during post-processing.

use async_trait::async_trait;

use super::progress::{log_event, parse_line, ProgressEvent};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::{DownloadSummary, PlaylistInfo};
use crate::downloader::options::{ExtractionOptions, PostProcessor, SOCKET_TIMEOUT_SECS};
use crate::downloader::tools::YtDlpCommand;
use crate::downloader::traits::PlaylistExtractor;
use crate::downloader::utils::{error_lines, run_output, run_streaming, stderr_preview};

pub struct CliExtractor {
    command: YtDlpCommand,
}

impl CliExtractor {
    pub fn new(command: YtDlpCommand) -> Self {
        Self { command }
    }

    fn probe_args(url: &str) -> Vec<String> {
        vec![
            "--flat-playlist".to_string(),
            "--dump-single-json".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            SOCKET_TIMEOUT_SECS.to_string(),
            url.to_string(),
        ]
    }

    /// Render extraction options as yt-dlp flags, URL last.
    pub fn download_args(url: &str, options: &ExtractionOptions) -> Vec<String> {
        let mut args = vec!["-f".to_string(), options.format.clone()];

        for pp in &options.post_processors {
            match pp {
                PostProcessor::ExtractAudio { codec, quality } => {
                    args.extend([
                        "-x".to_string(),
                        "--audio-format".to_string(),
                        codec.clone(),
                        "--audio-quality".to_string(),
                        quality.clone(),
                    ]);
                }
                PostProcessor::Metadata => args.push("--embed-metadata".to_string()),
                PostProcessor::EmbedThumbnail => args.push("--embed-thumbnail".to_string()),
            }
        }

        args.push("-o".to_string());
        args.push(options.output_template.to_string_lossy().into_owned());

        args.extend([
            "--socket-timeout".to_string(),
            options.socket_timeout_secs.to_string(),
            "--retries".to_string(),
            options.retries.to_string(),
            "--fragment-retries".to_string(),
            options.fragment_retries.to_string(),
        ]);

        if options.skip_unavailable_fragments {
            args.push("--skip-unavailable-fragments".to_string());
        }
        if options.overwrites {
            args.push("--force-overwrites".to_string());
        }
        if options.ignore_errors {
            args.push("--ignore-errors".to_string());
        }
        if options.geo_bypass {
            args.push("--geo-bypass".to_string());
        }

        // One progress update per line instead of carriage returns
        args.push("--newline".to_string());
        args.push(url.to_string());
        args
    }

    fn parse_probe(stdout: &[u8]) -> Result<PlaylistInfo, DownloadError> {
        serde_json::from_slice(stdout)
            .map_err(|e| DownloadError::ParseError(format!("Invalid JSON from yt-dlp: {}", e)))
    }
}

#[async_trait]
impl PlaylistExtractor for CliExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn probe(&self, url: &str) -> Result<PlaylistInfo, DownloadError> {
        let args = self.command.args_with(Self::probe_args(url));
        tracing::debug!("[{}] {} {}", self.name(), self.command.program, args.join(" "));

        let output = run_output(&self.command.program, &args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DownloadError::from(stderr_preview(&stderr)));
        }

        Self::parse_probe(&output.stdout)
    }

    async fn download(
        &self,
        url: &str,
        options: &ExtractionOptions,
    ) -> Result<DownloadSummary, DownloadError> {
        let args = self.command.args_with(Self::download_args(url, options));
        tracing::debug!("[{}] {} {}", self.name(), self.command.program, args.join(" "));

        let mut tracks_completed = 0;
        let output = run_streaming(&self.command.program, &args, |line| {
            if let Some(event) = parse_line(line) {
                if matches!(event, ProgressEvent::Converting(_)) {
                    tracks_completed += 1;
                }
                log_event(&event);
            }
        })
        .await?;

        let entry_errors = error_lines(&output.stderr);
        if output.status.success() {
            return Ok(DownloadSummary {
                tracks_completed,
                entry_errors,
            });
        }

        // With --ignore-errors yt-dlp exits 1 when any entry failed, even
        // though the rest of the playlist went through.
        if options.ignore_errors && tracks_completed > 0 {
            return Ok(DownloadSummary {
                tracks_completed,
                entry_errors,
            });
        }

        Err(DownloadError::from(stderr_preview(&output.stderr)))
    }
}
