use std::time::Duration;

use crate::pacing::PacingConfig;
use crate::sources::generic::NewsSiteConfig;

pub fn config() -> NewsSiteConfig {
    NewsSiteConfig {
        name: "Philstar",
        host: "www.philstar.com",
        seed_urls: &[],
        feed_urls: &["https://www.philstar.com/rss/headlines"],
        section_urls: &["https://www.philstar.com/headlines"],
        section_paths: &["/headlines"],
        pacing: PacingConfig::new(Duration::from_millis(800), 1000),
    }
}
