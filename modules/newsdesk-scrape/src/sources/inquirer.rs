use std::time::Duration;

use crate::pacing::PacingConfig;
use crate::sources::generic::NewsSiteConfig;

pub fn config() -> NewsSiteConfig {
    NewsSiteConfig {
        name: "Inquirer",
        host: "newsinfo.inquirer.net",
        seed_urls: &[],
        feed_urls: &["https://newsinfo.inquirer.net/feed"],
        section_urls: &["https://newsinfo.inquirer.net/"],
        section_paths: &[],
        pacing: PacingConfig::new(Duration::from_millis(950), 1400),
    }
}
