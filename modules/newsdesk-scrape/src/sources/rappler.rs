use std::time::Duration;

use crate::pacing::PacingConfig;
use crate::sources::generic::NewsSiteConfig;

/// `RAPPLER_LATEST_MAX_PAGES` (§6) bounds how many "load more" section
/// pages this adapter's tier-4 discovery will page through. Tier 4 here
/// only scrapes the configured section URLs directly; pagination beyond
/// that is a tier-5 (full-browser) concern left to the caller.
pub fn config() -> NewsSiteConfig {
    NewsSiteConfig {
        name: "Rappler",
        host: "www.rappler.com",
        seed_urls: &[],
        feed_urls: &["https://www.rappler.com/feed/"],
        section_urls: &[
            "https://www.rappler.com/nation/",
            "https://www.rappler.com/philippines/",
        ],
        section_paths: &["/nation", "/philippines"],
        pacing: PacingConfig::new(Duration::from_millis(900), 1300),
    }
}
