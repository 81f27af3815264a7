use newsdesk_common::NormalizedArticle;
use tracing::{debug, info, warn};

use crate::adapter::SourceAdapter;
use crate::error::ScrapeError;

/// Oversample factor applied to `max_articles` before calling `discover`
/// (§4.5 step 2), within the spec's 3-5 range.
pub const DISCOVERY_OVERSAMPLE: usize = 4;

/// One per-URL failure recorded against a run, never fatal to the run
/// itself (§4.5 step 3, §7).
#[derive(Debug, Clone)]
pub struct UrlError {
    pub url: String,
    pub message: String,
    pub transient: bool,
}

/// Everything a scrape run produced, handed to the store layer by the
/// caller (§4.5 steps 4-5). This crate never touches the datastore or the
/// queue — that's `newsdesk-store` and `newsdesk-queue`'s job.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub articles: Vec<NormalizedArticle>,
    pub errors: Vec<UrlError>,
}

/// Orchestrates one source's discover → fetch → extract loop (§4.5).
/// Stateless: holds no run-log or datastore handle, so it is trivially
/// testable with [`crate::fetcher::test_support::MockContentFetcher`].
pub struct ScrapeRunner;

impl ScrapeRunner {
    /// Run one source to completion, collecting up to `max_articles`
    /// successfully extracted articles. A per-URL fetch/extract failure is
    /// recorded and the loop continues; it never aborts the run.
    pub async fn run(adapter: &dyn SourceAdapter, max_articles: usize) -> RunOutcome {
        let mut outcome = RunOutcome::default();
        let oversample = max_articles.saturating_mul(DISCOVERY_OVERSAMPLE).max(max_articles);

        let candidates = match adapter.discover(oversample).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(source = adapter.name(), error = %e, "discovery failed");
                outcome.errors.push(UrlError {
                    url: String::new(),
                    message: format!("discovery: {e}"),
                    transient: false,
                });
                return outcome;
            }
        };

        info!(source = adapter.name(), candidates = candidates.len(), "discovery complete");

        let pacing = adapter.pacing();
        for (i, url) in candidates.into_iter().enumerate() {
            if outcome.articles.len() >= max_articles {
                break;
            }
            if i > 0 {
                pacing.wait().await;
            }

            match Self::fetch_and_extract(adapter, &url).await {
                Ok(article) => outcome.articles.push(article),
                Err(e) => {
                    let transient = matches!(&e, ScrapeError::Fetch(_) | ScrapeError::Timeout(_));
                    debug!(source = adapter.name(), url, error = %e, "url skipped");
                    outcome.errors.push(UrlError {
                        url,
                        message: e.to_string(),
                        transient,
                    });
                    if matches!(e, ScrapeError::Throttled) {
                        // Upstream is actively rate-limiting us; abort the
                        // remainder of this run's discovery list rather
                        // than hammer it further (§7).
                        break;
                    }
                }
            }
        }

        outcome
    }

    async fn fetch_and_extract(
        adapter: &dyn SourceAdapter,
        url: &str,
    ) -> Result<NormalizedArticle, ScrapeError> {
        let doc = adapter.fetch(url).await?;
        adapter
            .extract(&doc, url)
            .map_err(|e| ScrapeError::Extract(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use newsdesk_common::NormalizedArticle;

    use super::*;
    use crate::adapter::SourceAdapter;
    use crate::document::FetchedDocument;
    use crate::error::{ExtractError, Result};
    use crate::fetcher::test_support::MockContentFetcher;
    use crate::fetcher::ContentFetcher;
    use crate::pacing::PacingConfig;

    struct FixedAdapter {
        fetcher: Arc<MockContentFetcher>,
        urls: Vec<String>,
        bad_extract: Vec<String>,
    }

    #[async_trait]
    impl SourceAdapter for FixedAdapter {
        fn name(&self) -> &'static str {
            "Fixed"
        }

        fn pacing(&self) -> PacingConfig {
            PacingConfig::new(Duration::from_millis(1), 1)
        }

        async fn discover(&self, limit: usize) -> Result<Vec<String>> {
            Ok(self.urls.iter().take(limit).cloned().collect())
        }

        async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
            self.fetcher.fetch(url).await
        }

        fn extract(
            &self,
            _doc: &FetchedDocument,
            url: &str,
        ) -> std::result::Result<NormalizedArticle, ExtractError> {
            if self.bad_extract.contains(&url.to_string()) {
                return Err(ExtractError::TitleTooShort);
            }
            Ok(NormalizedArticle {
                source: "Fixed".to_string(),
                category: "General".to_string(),
                raw_category: String::new(),
                title: format!("Title for {url}"),
                content: Some("x".repeat(60)),
                url: url.to_string(),
                published_at: None,
            })
        }
    }

    #[tokio::test]
    async fn collects_up_to_max_articles() {
        let fetcher = Arc::new(MockContentFetcher::new());
        for i in 0..5 {
            fetcher.set_ok(&format!("https://x.com/{i}"), "<html></html>");
        }
        let adapter = FixedAdapter {
            fetcher,
            urls: (0..5).map(|i| format!("https://x.com/{i}")).collect(),
            bad_extract: vec![],
        };

        let outcome = ScrapeRunner::run(&adapter, 3).await;
        assert_eq!(outcome.articles.len(), 3);
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn per_url_failure_does_not_abort_run() {
        let fetcher = Arc::new(MockContentFetcher::new());
        fetcher.set_ok("https://x.com/0", "<html></html>");
        fetcher.set_err("https://x.com/1", ScrapeError::Fetch("boom".to_string()));
        fetcher.set_ok("https://x.com/2", "<html></html>");

        let adapter = FixedAdapter {
            fetcher,
            urls: vec![
                "https://x.com/0".to_string(),
                "https://x.com/1".to_string(),
                "https://x.com/2".to_string(),
            ],
            bad_extract: vec![],
        };

        let outcome = ScrapeRunner::run(&adapter, 10).await;
        assert_eq!(outcome.articles.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].transient);
    }

    #[tokio::test]
    async fn throttled_response_aborts_remaining_candidates() {
        let fetcher = Arc::new(MockContentFetcher::new());
        fetcher.set_err("https://x.com/0", ScrapeError::Throttled);
        fetcher.set_ok("https://x.com/1", "<html></html>");

        let adapter = FixedAdapter {
            fetcher,
            urls: vec!["https://x.com/0".to_string(), "https://x.com/1".to_string()],
            bad_extract: vec![],
        };

        let outcome = ScrapeRunner::run(&adapter, 10).await;
        assert_eq!(outcome.articles.len(), 0);
        assert_eq!(outcome.errors.len(), 1);
    }

    #[tokio::test]
    async fn extract_failure_is_recorded_as_permanent() {
        let fetcher = Arc::new(MockContentFetcher::new());
        fetcher.set_ok("https://x.com/0", "<html></html>");

        let adapter = FixedAdapter {
            fetcher,
            urls: vec!["https://x.com/0".to_string()],
            bad_extract: vec!["https://x.com/0".to_string()],
        };

        let outcome = ScrapeRunner::run(&adapter, 10).await;
        assert_eq!(outcome.articles.len(), 0);
        assert_eq!(outcome.errors.len(), 1);
        assert!(!outcome.errors[0].transient);
    }

    #[tokio::test]
    async fn discovery_failure_yields_empty_outcome_with_error() {
        struct FailingDiscovery;

        #[async_trait]
        impl SourceAdapter for FailingDiscovery {
            fn name(&self) -> &'static str {
                "Failing"
            }
            async fn discover(&self, _limit: usize) -> Result<Vec<String>> {
                Err(ScrapeError::Discovery("no feeds reachable".to_string()))
            }
            async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
                Ok(FetchedDocument::new(url, ""))
            }
            fn extract(
                &self,
                _doc: &FetchedDocument,
                url: &str,
            ) -> std::result::Result<NormalizedArticle, ExtractError> {
                Err(ExtractError::Failed(format!("never reached: {url}")))
            }
        }

        let outcome = ScrapeRunner::run(&FailingDiscovery, 5).await;
        assert!(outcome.articles.is_empty());
        assert_eq!(outcome.errors.len(), 1);
    }
}
