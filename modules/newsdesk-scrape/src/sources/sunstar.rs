use std::time::Duration;

use crate::pacing::PacingConfig;
use crate::sources::generic::NewsSiteConfig;

pub fn config() -> NewsSiteConfig {
    NewsSiteConfig {
        name: "SunStar",
        host: "www.sunstar.com.ph",
        seed_urls: &[],
        feed_urls: &["https://www.sunstar.com.ph/rss"],
        section_urls: &["https://www.sunstar.com.ph/philippines"],
        section_paths: &["/philippines"],
        pacing: PacingConfig::new(Duration::from_millis(900), 1300),
    }
}
