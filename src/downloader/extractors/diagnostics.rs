// Known causes behind yt-dlp failures, used to annotate error logs

/// Why YouTube Music refused a playlist or track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingReason {
    /// Playlist or video is private
    Private,
    /// Deleted, removed, or never existed
    Unavailable,
    /// Account sign-in needed (age gate, Premium, members)
    SignInRequired,
    /// Not available in this country
    GeoBlocked,
    /// HTTP 429 or similar
    RateLimited,
    /// "Sign in to confirm you're not a bot"
    BotDetection,
    /// HTTP 403
    Forbidden,
}

impl BlockingReason {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Private => "Private playlist or video",
            Self::Unavailable => "Playlist or video unavailable",
            Self::SignInRequired => "Sign-in required",
            Self::GeoBlocked => "Geographic restriction",
            Self::RateLimited => "Rate limited by YouTube",
            Self::BotDetection => "Bot detection triggered",
            Self::Forbidden => "Access denied (HTTP 403)",
        }
    }

    /// Whether `--rate-limit` is likely to help on later runs
    pub fn rate_limit_might_help(&self) -> bool {
        matches!(self, Self::RateLimited | Self::BotDetection | Self::Forbidden)
    }

    pub fn hint(&self) -> String {
        if self.rate_limit_might_help() {
            format!("{}; try again later with --rate-limit", self.description())
        } else {
            self.description().to_string()
        }
    }
}

/// Match an error message against known causes, most specific first.
pub fn diagnose_error(error: &str) -> Option<BlockingReason> {
    let lower = error.to_lowercase();

    // Bot check also says "sign in", so it goes before the sign-in patterns
    if lower.contains("not a bot") || lower.contains("captcha") || lower.contains("unusual traffic") {
        return Some(BlockingReason::BotDetection);
    }

    if lower.contains("private video")
        || lower.contains("playlist is private")
        || lower.contains("video is private")
        || lower.contains("playlist does not exist")
    {
        return Some(BlockingReason::Private);
    }

    if lower.contains("sign in to confirm your age")
        || lower.contains("age-restricted")
        || lower.contains("youtube premium")
        || lower.contains("members-only")
        || lower.contains("login required")
    {
        return Some(BlockingReason::SignInRequired);
    }

    if lower.contains("not available in your country") || lower.contains("blocked in your country") {
        return Some(BlockingReason::GeoBlocked);
    }

    if lower.contains("video unavailable")
        || lower.contains("has been removed")
        || lower.contains("no longer available")
        || lower.contains("http error 404")
    {
        return Some(BlockingReason::Unavailable);
    }

    if lower.contains("429") || lower.contains("too many requests") || lower.contains("rate limit") {
        return Some(BlockingReason::RateLimited);
    }

    if lower.contains("403") || lower.contains("forbidden") {
        return Some(BlockingReason::Forbidden);
    }

    None
}
