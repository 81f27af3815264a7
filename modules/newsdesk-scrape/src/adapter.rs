use async_trait::async_trait;
use newsdesk_common::NormalizedArticle;

use crate::document::FetchedDocument;
use crate::error::{ExtractError, Result};
use crate::pacing::PacingConfig;

/// Minimum accepted title length (§4.4).
pub const MIN_TITLE_CHARS: usize = 10;
/// Minimum accepted content length when content is present (§4.4).
pub const MIN_CONTENT_CHARS: usize = 50;

/// The per-source capability set (§4.4, §9: "single interface, tagged
/// variants per source"). A failure in one adapter's `discover`/`fetch`
/// call never surfaces as a panic — everything fallible returns `Result`
/// so the runner can keep iterating other sources.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Canonical display name stored on `Article.source`.
    fn name(&self) -> &'static str;

    /// Per-source stealth-pacing configuration (§5).
    fn pacing(&self) -> PacingConfig {
        PacingConfig::default()
    }

    /// Combine discovery tiers to produce up to `limit` ordered candidate
    /// URLs (§4.4, §4.5 step 2).
    async fn discover(&self, limit: usize) -> Result<Vec<String>>;

    /// Fetch a single URL's document.
    async fn fetch(&self, url: &str) -> Result<FetchedDocument>;

    /// Parse a fetched document into a normalized article, or an
    /// [`ExtractError`] when the page doesn't qualify (§4.4).
    fn extract(&self, doc: &FetchedDocument, url: &str) -> std::result::Result<NormalizedArticle, ExtractError>;
}

/// Shared extraction validation used by every adapter's `extract`: applies
/// the title-length floor, the content floor (when content is present),
/// and the `og:type`/short-content "not an article" gate (§4.4).
pub fn validate_extraction(
    title: &str,
    content: Option<&str>,
    og_type: Option<&str>,
) -> std::result::Result<(), ExtractError> {
    if title.trim().chars().count() < MIN_TITLE_CHARS {
        return Err(ExtractError::TitleTooShort);
    }

    let content_len = content.map(|c| c.trim().chars().count()).unwrap_or(0);
    let non_article_type = og_type
        .map(|t| !t.eq_ignore_ascii_case("article"))
        .unwrap_or(false);

    if non_article_type && content_len < MIN_CONTENT_CHARS {
        return Err(ExtractError::NotArticle);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_title() {
        assert_eq!(
            validate_extraction("short", Some("x".repeat(100).as_str()), Some("article")),
            Err(ExtractError::TitleTooShort)
        );
    }

    #[test]
    fn rejects_non_article_with_short_content() {
        let title = "This is a long enough title for the gate";
        assert_eq!(
            validate_extraction(title, Some("too short"), Some("website")),
            Err(ExtractError::NotArticle)
        );
    }

    #[test]
    fn accepts_article_type_regardless_of_content_length() {
        let title = "This is a long enough title for the gate";
        assert!(validate_extraction(title, None, Some("article")).is_ok());
    }

    #[test]
    fn accepts_non_article_type_with_long_content() {
        let title = "This is a long enough title for the gate";
        let content = "x".repeat(100);
        assert!(validate_extraction(title, Some(&content), Some("website")).is_ok());
    }
}
