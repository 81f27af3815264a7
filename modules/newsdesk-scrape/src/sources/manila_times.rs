use std::time::Duration;

use crate::pacing::PacingConfig;
use crate::sources::generic::NewsSiteConfig;

pub fn config() -> NewsSiteConfig {
    NewsSiteConfig {
        name: "Manila Times",
        host: "www.manilatimes.net",
        seed_urls: &[],
        feed_urls: &["https://www.manilatimes.net/news/feed"],
        section_urls: &["https://www.manilatimes.net/news"],
        section_paths: &["/news"],
        pacing: PacingConfig::new(Duration::from_millis(850), 1100),
    }
}
