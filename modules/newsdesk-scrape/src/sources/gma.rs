use std::time::Duration;

use crate::pacing::PacingConfig;
use crate::sources::generic::NewsSiteConfig;

pub fn config() -> NewsSiteConfig {
    NewsSiteConfig {
        name: "GMA News",
        host: "www.gmanetwork.com",
        seed_urls: &[],
        feed_urls: &["https://data.gmanetwork.com/gno/rss/news/nation/feed.xml"],
        section_urls: &["https://www.gmanetwork.com/news/topstories/nation/"],
        section_paths: &["/news/topstories/nation"],
        pacing: PacingConfig::new(Duration::from_millis(850), 1100),
    }
}
