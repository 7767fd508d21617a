// Parsing of yt-dlp's `--newline` stdout

use regex::Regex;

/// Something worth reporting from a yt-dlp stdout line
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// `[download] Downloading item 3 of 12`
    Item { index: u32, total: u32 },
    /// `[download] Destination: <file>`
    Destination(String),
    /// `[download]  12.5% of ~ 3.10MiB at 374.36KiB/s ETA 00:07`
    Downloading {
        percent: f32,
        size: String,
        speed: String,
        eta: Option<String>,
    },
    /// `[download] <file> has already been downloaded`
    AlreadyDownloaded(String),
    /// `[ExtractAudio] Destination: <file>.mp3`
    Converting(String),
}

lazy_static::lazy_static! {
    static ref PROGRESS_RE: Regex = Regex::new(
        r"\[download\]\s+(\d+\.?\d*)%\s+of\s+~?\s*(\d+\.?\d*\s*\w+)\s+at\s+(\S+(?:\s*\w+/s)?)(?:\s+ETA\s+(\S+))?"
    ).unwrap();
    static ref ITEM_RE: Regex = Regex::new(r"\[download\]\s+Downloading item (\d+) of (\d+)").unwrap();
    static ref DEST_RE: Regex = Regex::new(r"\[download\]\s+Destination:\s+(.+)").unwrap();
    static ref ALREADY_RE: Regex = Regex::new(r"\[download\]\s+(.+) has already been downloaded").unwrap();
    static ref CONVERT_RE: Regex = Regex::new(r"\[ExtractAudio\]\s+(?:Destination:\s+(.+)|Not converting audio (.+?);)").unwrap();
}

pub fn parse_line(line: &str) -> Option<ProgressEvent> {
    if let Some(caps) = PROGRESS_RE.captures(line) {
        let percent: f32 = caps.get(1)?.as_str().parse().ok()?;
        return Some(ProgressEvent::Downloading {
            percent,
            size: caps.get(2).map_or("?", |m| m.as_str()).to_string(),
            speed: caps.get(3).map_or("?", |m| m.as_str()).to_string(),
            eta: caps.get(4).map(|m| m.as_str().to_string()),
        });
    }

    if let Some(caps) = ITEM_RE.captures(line) {
        return Some(ProgressEvent::Item {
            index: caps.get(1)?.as_str().parse().ok()?,
            total: caps.get(2)?.as_str().parse().ok()?,
        });
    }

    if let Some(caps) = DEST_RE.captures(line) {
        return Some(ProgressEvent::Destination(caps.get(1)?.as_str().to_string()));
    }

    if let Some(caps) = ALREADY_RE.captures(line) {
        return Some(ProgressEvent::AlreadyDownloaded(caps.get(1)?.as_str().to_string()));
    }

    if let Some(caps) = CONVERT_RE.captures(line) {
        let file = caps.get(1).or_else(|| caps.get(2))?;
        return Some(ProgressEvent::Converting(file.as_str().to_string()));
    }

    None
}

/// Log one event; per-percent updates only show up with `--verbose`.
pub fn log_event(event: &ProgressEvent) {
    match event {
        ProgressEvent::Item { index, total } => {
            tracing::info!("Track {}/{}", index, total);
        }
        ProgressEvent::Destination(file) => {
            tracing::info!("Downloading: {}", file);
        }
        ProgressEvent::Downloading {
            percent,
            size,
            speed,
            eta,
        } => {
            tracing::debug!(
                "{:.1}% of {} at {} (ETA: {})",
                percent,
                size,
                speed,
                eta.as_deref().unwrap_or("?")
            );
        }
        ProgressEvent::AlreadyDownloaded(file) => {
            tracing::info!("Already downloaded: {}", file);
        }
        ProgressEvent::Converting(file) => {
            tracing::info!("Downloaded, converting to MP3: {}", file);
        }
    }
}
