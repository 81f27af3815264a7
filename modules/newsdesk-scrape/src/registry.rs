use std::collections::HashMap;
use std::sync::Arc;

use crate::adapter::SourceAdapter;
use crate::fetcher::{BrowserlessFetcher, ContentFetcher, HttpFetcher};
use crate::sources::{GenericAdapter, ALL_SOURCE_CONFIGS};

/// Maps a source name to its adapter. Adding a publisher means adding one
/// entry here and a config in `sources/`; the runner never references a
/// concrete adapter type (§4.4).
#[derive(Clone)]
pub struct SourceRegistry {
    adapters: HashMap<&'static str, Arc<dyn SourceAdapter>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) {
        self.adapters.insert(adapter.name(), adapter);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SourceAdapter>> {
        self.adapters.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.adapters.keys().copied().collect()
    }

    /// The seven shipped publishers, each sharing one [`HttpFetcher`].
    pub fn default_sources() -> Self {
        Self::default_sources_with_browserless(None, None)
    }

    /// Same as [`Self::default_sources`], but wires a tier-5 (§4.4)
    /// full-browser fetcher into each adapter when a browserless base URL
    /// is configured. With no URL, behaves identically to
    /// `default_sources`.
    pub fn default_sources_with_browserless(
        browserless_url: Option<&str>,
        browserless_token: Option<&str>,
    ) -> Self {
        let fetcher: Arc<dyn ContentFetcher> = Arc::new(HttpFetcher::new());
        let browserless: Option<Arc<dyn ContentFetcher>> = browserless_url.map(|url| {
            Arc::new(BrowserlessFetcher::new(newsdesk_browserless::BrowserlessClient::new(
                url,
                browserless_token,
            ))) as Arc<dyn ContentFetcher>
        });

        let mut registry = Self::new();
        for make_config in ALL_SOURCE_CONFIGS {
            let mut adapter = GenericAdapter::new(make_config(), fetcher.clone());
            if let Some(browserless) = &browserless {
                adapter = adapter.with_browserless(browserless.clone());
            }
            registry.register(Arc::new(adapter));
        }
        registry
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sources_registers_all_seven() {
        let registry = SourceRegistry::default_sources();
        let mut names = registry.names();
        names.sort();
        assert_eq!(
            names,
            vec![
                "GMA News",
                "Inquirer",
                "Manila Bulletin",
                "Manila Times",
                "Philstar",
                "Rappler",
                "SunStar",
            ]
        );
    }

    #[test]
    fn unknown_source_is_none() {
        let registry = SourceRegistry::default_sources();
        assert!(registry.get("not-a-source").is_none());
    }
}
