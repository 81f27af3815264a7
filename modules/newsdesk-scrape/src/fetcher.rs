use std::time::Duration;

use async_trait::async_trait;

use crate::document::FetchedDocument;
use crate::error::{Result, ScrapeError};

/// Transport seam for fetching a URL's HTML. Real adapters use
/// [`HttpFetcher`]; tests use an in-memory fake registered under the
/// `test-support` feature.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument>;
}

/// Plain HTTP fetcher backing discovery tiers 1-4 (§4.4). Tier 5
/// (full-browser rendering) goes through `newsdesk-browserless` instead.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("Mozilla/5.0 (compatible; newsdesk-scrape/0.1)")
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ScrapeError::Timeout(url.to_string())
            } else {
                ScrapeError::Fetch(e.to_string())
            }
        })?;

        let status = resp.status();
        if status.as_u16() == 403 || status.as_u16() == 429 {
            return Err(ScrapeError::Throttled);
        }
        if !status.is_success() {
            return Err(ScrapeError::Fetch(format!("status {status}")));
        }

        let final_url = resp.url().to_string();
        let html = resp
            .text()
            .await
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;

        Ok(FetchedDocument::new(final_url, html))
    }
}

/// Tier-5 discovery transport (§4.4): full-browser rendering via
/// `newsdesk-browserless`, for section pages whose article links are
/// injected by client-side JS and never appear in the plain-HTTP response
/// tiers 1-4 see.
pub struct BrowserlessFetcher {
    client: newsdesk_browserless::BrowserlessClient,
}

impl BrowserlessFetcher {
    pub fn new(client: newsdesk_browserless::BrowserlessClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentFetcher for BrowserlessFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
        let html = self.client.content(url).await.map_err(|e| ScrapeError::Fetch(e.to_string()))?;
        Ok(FetchedDocument::new(url, html))
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// In-memory fetcher for runner/adapter tests: no network, deterministic
    /// responses keyed by URL.
    #[derive(Default)]
    pub struct MockContentFetcher {
        pages: Mutex<HashMap<String, Result<FetchedDocument>>>,
    }

    impl MockContentFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_ok(&self, url: &str, html: &str) {
            self.pages.lock().unwrap().insert(
                url.to_string(),
                Ok(FetchedDocument::new(url.to_string(), html.to_string())),
            );
        }

        pub fn set_err(&self, url: &str, err: ScrapeError) {
            self.pages.lock().unwrap().insert(url.to_string(), Err(err));
        }
    }

    #[async_trait]
    impl ContentFetcher for MockContentFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
            match self.pages.lock().unwrap().get(url) {
                Some(Ok(doc)) => Ok(doc.clone()),
                Some(Err(e)) => Err(clone_error(e)),
                None => Err(ScrapeError::Fetch(format!("no fixture for {url}"))),
            }
        }
    }

    fn clone_error(e: &ScrapeError) -> ScrapeError {
        match e {
            ScrapeError::Fetch(s) => ScrapeError::Fetch(s.clone()),
            ScrapeError::Throttled => ScrapeError::Throttled,
            ScrapeError::Timeout(s) => ScrapeError::Timeout(s.clone()),
            ScrapeError::Extract(s) => ScrapeError::Extract(s.clone()),
            ScrapeError::NotArticle => ScrapeError::NotArticle,
            ScrapeError::Discovery(s) => ScrapeError::Discovery(s.clone()),
            ScrapeError::Other(_) => ScrapeError::Fetch("mock error".to_string()),
        }
    }
}
