use std::time::Duration;

use crate::pacing::PacingConfig;
use crate::sources::generic::NewsSiteConfig;

pub fn config() -> NewsSiteConfig {
    NewsSiteConfig {
        name: "Manila Bulletin",
        host: "mb.com.ph",
        seed_urls: &[],
        feed_urls: &["https://mb.com.ph/rss/news"],
        section_urls: &["https://mb.com.ph/category/news"],
        section_paths: &["/category/news"],
        pacing: PacingConfig::new(Duration::from_millis(800), 1200),
    }
}
