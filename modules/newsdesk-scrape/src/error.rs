pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Per-URL and per-run failure modes (§7). `is_transient` drives the retry
/// loop in [`crate::runner::ScrapeRunner`]; permanent errors are recorded
/// against the run but never retried within the same attempt.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("request throttled (403/429)")]
    Throttled,

    #[error("timed out fetching {0}")]
    Timeout(String),

    #[error("extract failed: {0}")]
    Extract(String),

    #[error("not an article page")]
    NotArticle,

    #[error("discovery failed: {0}")]
    Discovery(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrapeError {
    /// Transient network failures (timeout, connection reset, 5xx) are
    /// worth retrying per-URL; throttling, parse, and gate errors are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScrapeError::Fetch(_) | ScrapeError::Timeout(_))
    }
}

/// Extraction-specific failure, kept distinct from [`ScrapeError`] since
/// adapters return it from a synchronous, non-network step (§4.4).
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ExtractError {
    #[error("title missing or too short")]
    TitleTooShort,

    #[error("content gate: not an article")]
    NotArticle,

    #[error("extraction failed: {0}")]
    Failed(String),
}
