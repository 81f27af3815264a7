use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::Result;
use crate::fetcher::ContentFetcher;

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href\s*=\s*["']([^"']+)["']"#).expect("valid regex"));

/// Resolve a raw `href` against `base`, stripping the fragment.
fn resolve_href(raw: &str, base: Option<&url::Url>) -> Option<String> {
    let mut parsed = if raw.starts_with("http://") || raw.starts_with("https://") {
        url::Url::parse(raw).ok()?
    } else {
        base?.join(raw).ok()?
    };
    parsed.set_fragment(None);
    Some(parsed.to_string())
}

/// Extract every `href` link in `html`, resolved against `base_url` and
/// deduplicated, preserving first-seen order.
pub fn extract_all_links(html: &str, base_url: &str) -> Vec<String> {
    let base = url::Url::parse(base_url).ok();
    let mut seen = std::collections::HashSet::new();
    let mut links = Vec::new();
    for cap in HREF_RE.captures_iter(html) {
        if let Some(resolved) = resolve_href(&cap[1], base.as_ref()) {
            if seen.insert(resolved.clone()) {
                links.push(resolved);
            }
        }
    }
    links
}

/// Links matching a substring pattern (the shape used by section-landing
/// scraping, tier 4 of §4.4).
pub fn extract_links_by_pattern(html: &str, base_url: &str, pattern: &str) -> Vec<String> {
    extract_all_links(html, base_url)
        .into_iter()
        .filter(|url| pattern.is_empty() || url.contains(pattern))
        .collect()
}

static STATIC_ASSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|gif|svg|css|js|pdf|ico|webp)(\?.*)?$").expect("valid regex")
});

static TRACKER_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(/tag/|/author/|/search|/page/\d+)").expect("valid regex")
});

/// Domain-anchored URL validation shared by every adapter (§4.4): the link
/// must belong to `publisher_host`, must not be a tracker path or static
/// asset, and must not match one of the adapter's known section-landing
/// paths.
pub fn is_candidate_article_url(url: &str, publisher_host: &str, section_paths: &[&str]) -> bool {
    let Ok(parsed) = url::Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    if !host.eq_ignore_ascii_case(publisher_host) {
        return false;
    }
    if STATIC_ASSET_RE.is_match(url) || TRACKER_PATH_RE.is_match(url) {
        return false;
    }
    let path = parsed.path().trim_end_matches('/');
    if section_paths.iter().any(|p| path.eq_ignore_ascii_case(p)) {
        return false;
    }
    true
}

/// Shared tiered-discovery helper (§4.4). An adapter supplies its seed
/// list, feed URLs, section paths, and host; this helper combines the five
/// tiers in order of decreasing reliability and stops once `limit`
/// candidates are collected.
pub struct DiscoveryTiers<'a> {
    pub publisher_host: &'a str,
    pub seed_urls: &'a [&'a str],
    pub feed_urls: &'a [&'a str],
    pub section_urls: &'a [&'a str],
}

impl<'a> DiscoveryTiers<'a> {
    /// Run all five discovery tiers in order of decreasing reliability,
    /// stopping as soon as `limit` candidates are collected (§4.4). Tier 3
    /// (a public news-index redirector) is an external collaborator with
    /// no normative interface in this spec and is skipped; tier 5
    /// (full-browser section rendering) only runs when `tier5` is given —
    /// callers without a configured `BROWSERLESS_URL` simply stop after
    /// tier 4.
    pub async fn run(
        &self,
        fetcher: &dyn ContentFetcher,
        tier5: Option<&dyn ContentFetcher>,
        limit: usize,
    ) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        let mut seen = std::collections::HashSet::new();

        let mut push_unique = |urls: Vec<String>, candidates: &mut Vec<String>| {
            for u in urls {
                if seen.insert(u.clone()) {
                    candidates.push(u);
                }
            }
        };

        // Tier 1: static known-article seeds.
        push_unique(
            self.seed_urls.iter().map(|s| s.to_string()).collect(),
            &mut candidates,
        );
        if candidates.len() >= limit {
            candidates.truncate(limit);
            return candidates;
        }

        // Tier 2: syndication feed(s).
        for feed_url in self.feed_urls {
            match self.fetch_feed_links(fetcher, feed_url).await {
                Ok(links) => push_unique(links, &mut candidates),
                Err(e) => warn!(feed_url, error = %e, "feed discovery failed"),
            }
            if candidates.len() >= limit {
                break;
            }
        }
        if candidates.len() >= limit {
            candidates.truncate(limit);
            return candidates;
        }

        // Tier 4: section landing pages (tier 3, a public news-index
        // redirector, is an external collaborator not exercised here —
        // adapters that need it supply their own seed/feed URLs instead).
        for section_url in self.section_urls {
            match fetcher.fetch(section_url).await {
                Ok(doc) => {
                    let links = extract_links_by_pattern(&doc.html, section_url, "");
                    let filtered: Vec<String> = links
                        .into_iter()
                        .filter(|u| {
                            is_candidate_article_url(u, self.publisher_host, self.section_urls_stripped())
                        })
                        .collect();
                    push_unique(filtered, &mut candidates);
                }
                Err(e) => debug!(section_url, error = %e, "section page fetch failed"),
            }
            if candidates.len() >= limit {
                break;
            }
        }

        if candidates.len() >= limit {
            candidates.truncate(limit);
            return candidates;
        }

        // Tier 5: full-browser rendering, for section pages whose links are
        // injected by client-side JS and invisible to the plain-HTTP fetch
        // tier 4 just tried. Only runs when the caller has a browserless
        // client configured.
        if let Some(tier5) = tier5 {
            for section_url in self.section_urls {
                match tier5.fetch(section_url).await {
                    Ok(doc) => {
                        let links = extract_links_by_pattern(&doc.html, section_url, "");
                        let filtered: Vec<String> = links
                            .into_iter()
                            .filter(|u| {
                                is_candidate_article_url(u, self.publisher_host, self.section_urls_stripped())
                            })
                            .collect();
                        push_unique(filtered, &mut candidates);
                    }
                    Err(e) => debug!(section_url, error = %e, "browser-rendered section fetch failed"),
                }
                if candidates.len() >= limit {
                    break;
                }
            }
        }

        candidates.truncate(limit);
        candidates
    }

    fn section_urls_stripped(&self) -> &[&str] {
        self.section_urls
    }

    async fn fetch_feed_links(&self, fetcher: &dyn ContentFetcher, feed_url: &str) -> Result<Vec<String>> {
        let doc = fetcher.fetch(feed_url).await?;
        let feed = feed_rs::parser::parse(doc.html.as_bytes())
            .map_err(|e| crate::error::ScrapeError::Discovery(e.to_string()))?;
        let links = feed
            .entries
            .into_iter()
            .filter_map(|entry| entry.links.first().map(|l| l.href.clone()))
            .filter(|u| is_candidate_article_url(u, self.publisher_host, self.section_urls))
            .collect();
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::test_support::MockContentFetcher;

    #[tokio::test]
    async fn tier5_only_runs_when_tiers_1_2_4_fall_short() {
        let fetcher = MockContentFetcher::new();
        fetcher.set_ok("https://news.com/section", "<a href=\"/tag/x\">nope</a>");
        let browserless = MockContentFetcher::new();
        browserless.set_ok(
            "https://news.com/section",
            "<a href=\"/nation/js-rendered-story\">a</a>",
        );

        let tiers = DiscoveryTiers {
            publisher_host: "news.com",
            seed_urls: &[],
            feed_urls: &[],
            section_urls: &["https://news.com/section"],
        };

        let without_tier5 = tiers.run(&fetcher, None, 5).await;
        assert!(without_tier5.is_empty());

        let with_tier5 = tiers.run(&fetcher, Some(&browserless), 5).await;
        assert_eq!(with_tier5, vec!["https://news.com/nation/js-rendered-story"]);
    }

    #[test]
    fn rejects_cross_domain() {
        assert!(!is_candidate_article_url(
            "https://other.com/a/1",
            "news.com",
            &[]
        ));
    }

    #[test]
    fn rejects_tracker_paths() {
        assert!(!is_candidate_article_url(
            "https://news.com/tag/politics",
            "news.com",
            &[]
        ));
        assert!(!is_candidate_article_url(
            "https://news.com/author/jane",
            "news.com",
            &[]
        ));
        assert!(!is_candidate_article_url(
            "https://news.com/page/2",
            "news.com",
            &[]
        ));
    }

    #[test]
    fn rejects_static_assets() {
        assert!(!is_candidate_article_url(
            "https://news.com/img/photo.jpg",
            "news.com",
            &[]
        ));
    }

    #[test]
    fn rejects_known_section_landing_paths() {
        assert!(!is_candidate_article_url(
            "https://news.com/business",
            "news.com",
            &["/business"]
        ));
    }

    #[test]
    fn accepts_plain_article_url() {
        assert!(is_candidate_article_url(
            "https://news.com/business/2024/acme-profits",
            "news.com",
            &["/business"]
        ));
    }

    #[test]
    fn host_match_is_case_insensitive() {
        assert!(is_candidate_article_url(
            "https://NEWS.com/a/1",
            "news.com",
            &[]
        ));
    }

    #[test]
    fn extract_links_by_pattern_filters() {
        let html = r#"<a href="/business/1">a</a><a href="/sports/2">b</a>"#;
        let links = extract_links_by_pattern(html, "https://news.com", "/business/");
        assert_eq!(links, vec!["https://news.com/business/1"]);
    }
}
