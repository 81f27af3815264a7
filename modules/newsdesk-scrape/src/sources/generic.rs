use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newsdesk_common::NormalizedArticle;

use crate::adapter::{validate_extraction, SourceAdapter};
use crate::category;
use crate::content::html_to_readable_text;
use crate::discovery::DiscoveryTiers;
use crate::document::FetchedDocument;
use crate::error::{ExtractError, Result};
use crate::fetcher::ContentFetcher;
use crate::pacing::PacingConfig;

/// Per-publisher static configuration. Each concrete adapter (Rappler,
/// GMA, ...) is this config plus a name — the discovery/fetch/extract
/// logic itself lives once, here, per §9's "single interface + registry"
/// guidance.
pub struct NewsSiteConfig {
    pub name: &'static str,
    pub host: &'static str,
    pub seed_urls: &'static [&'static str],
    pub feed_urls: &'static [&'static str],
    pub section_urls: &'static [&'static str],
    pub section_paths: &'static [&'static str],
    pub pacing: PacingConfig,
}

pub struct GenericAdapter {
    config: NewsSiteConfig,
    fetcher: Arc<dyn ContentFetcher>,
    browserless: Option<Arc<dyn ContentFetcher>>,
}

impl GenericAdapter {
    pub fn new(config: NewsSiteConfig, fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self { config, fetcher, browserless: None }
    }

    /// Wire in a tier-5 (§4.4) full-browser fetcher, used only once tiers
    /// 1/2/4 leave discovery short of the requested limit.
    pub fn with_browserless(mut self, browserless: Arc<dyn ContentFetcher>) -> Self {
        self.browserless = Some(browserless);
        self
    }
}

#[async_trait]
impl SourceAdapter for GenericAdapter {
    fn name(&self) -> &'static str {
        self.config.name
    }

    fn pacing(&self) -> PacingConfig {
        self.config.pacing
    }

    async fn discover(&self, limit: usize) -> Result<Vec<String>> {
        let tiers = DiscoveryTiers {
            publisher_host: self.config.host,
            seed_urls: self.config.seed_urls,
            feed_urls: self.config.feed_urls,
            section_urls: self.config.section_urls,
        };
        let tier5 = self.browserless.as_deref();
        Ok(tiers.run(self.fetcher.as_ref(), tier5, limit).await)
    }

    async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
        self.fetcher.fetch(url).await
    }

    fn extract(
        &self,
        doc: &FetchedDocument,
        url: &str,
    ) -> std::result::Result<NormalizedArticle, ExtractError> {
        let title = doc
            .meta_property("og:title")
            .or_else(|| doc.title_tag())
            .unwrap_or_default();

        let og_type = doc.meta_property("og:type");
        let content = extract_content(doc);

        validate_extraction(&title, content.as_deref(), og_type.as_deref())?;

        let (category, raw_category) = category::resolve(doc, url);
        let published_at = extract_published_at(doc);

        Ok(NormalizedArticle {
            source: self.config.name.to_string(),
            category,
            raw_category,
            title,
            content,
            url: url.to_string(),
            published_at,
        })
    }
}

fn extract_content(doc: &FetchedDocument) -> Option<String> {
    let text = html_to_readable_text(&doc.html, Some(&doc.url));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn extract_published_at(doc: &FetchedDocument) -> Option<DateTime<Utc>> {
    let candidate = doc
        .meta_property("article:published_time")
        .or_else(|| doc.meta_name("publish-date"))
        .or_else(|| doc.meta_name("date"));

    if let Some(raw) = candidate {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for block in doc.ld_json() {
        if let Some(raw) = block.get("datePublished").and_then(|v| v.as_str()) {
            if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                return Some(dt.with_timezone(&Utc));
            }
        }
    }

    // Best-effort: scraper's own clock stands in when no timestamp parses.
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::test_support::MockContentFetcher;

    fn sample_config() -> NewsSiteConfig {
        NewsSiteConfig {
            name: "TestWire",
            host: "testwire.example",
            seed_urls: &[],
            feed_urls: &[],
            section_urls: &[],
            section_paths: &[],
            pacing: PacingConfig::default(),
        }
    }

    #[test]
    fn extracts_title_content_category() {
        let fetcher: Arc<dyn ContentFetcher> = Arc::new(MockContentFetcher::new());
        let adapter = GenericAdapter::new(sample_config(), fetcher);
        let html = r#"
            <html><head>
            <meta property="og:title" content="DPWH allocates P5 billion for flood control projects">
            <meta property="og:type" content="article">
            <meta property="article:section" content="Nation">
            </head><body><article><p>The Department of Public Works and Highways announced the allocation for infrastructure projects in Manila and nearby provinces this week, citing urgent flood mitigation needs across the region.</p></article></body></html>
        "#;
        let doc = FetchedDocument::new("https://testwire.example/nation/a-1", html);
        let article = adapter.extract(&doc, &doc.url).unwrap();
        assert_eq!(article.title, "DPWH allocates P5 billion for flood control projects");
        assert_eq!(article.category, "Nation");
        assert!(article.content.is_some());
    }

    #[test]
    fn rejects_short_title() {
        let fetcher: Arc<dyn ContentFetcher> = Arc::new(MockContentFetcher::new());
        let adapter = GenericAdapter::new(sample_config(), fetcher);
        let doc = FetchedDocument::new("u", "<title>Hi</title>");
        assert_eq!(adapter.extract(&doc, "u"), Err(ExtractError::TitleTooShort));
    }

    #[test]
    fn gates_non_article_with_short_content() {
        let fetcher: Arc<dyn ContentFetcher> = Arc::new(MockContentFetcher::new());
        let adapter = GenericAdapter::new(sample_config(), fetcher);
        let html = r#"<meta property="og:title" content="About Our Newsroom And Team">
                      <meta property="og:type" content="website">"#;
        let doc = FetchedDocument::new("u", html);
        assert_eq!(adapter.extract(&doc, "u"), Err(ExtractError::NotArticle));
    }
}
