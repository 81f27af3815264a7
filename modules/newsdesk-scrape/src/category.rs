use std::collections::HashMap;
use std::sync::LazyLock;

use crate::document::FetchedDocument;

/// URL path segments that never identify a category (§4.2 blacklist).
const BLACKLIST: &[&str] = &[
    "photo", "photos", "video", "videos", "about", "section", "tag", "author", "page",
];

static BREADCRUMB_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r#"(?is)<[^>]+class\s*=\s*["'][^"']*breadcrumb[^"']*["'][^>]*>(.*?)</"#)
        .expect("valid regex")
});

static BREADCRUMB_ITEM_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?is)<a[^>]*>([^<]+)</a>").expect("valid regex"));

/// Lowercase token → canonical display name (§4.2). Unknown tokens fall
/// back to a title-case rendering of the raw value.
static NORMALIZE: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("tech", "Technology"),
        ("technology", "Technology"),
        ("headlines", "Headlines"),
        ("headline", "Headlines"),
        ("nation", "Nation"),
        ("national", "Nation"),
        ("world", "World"),
        ("business", "Business"),
        ("biz", "Business"),
        ("sports", "Sports"),
        ("sport", "Sports"),
        ("entertainment", "Entertainment"),
        ("lifestyle", "Lifestyle"),
        ("opinion", "Opinion"),
        ("editorial", "Opinion"),
        ("metro", "Metro Manila"),
        ("metro-manila", "Metro Manila"),
        ("regions", "Regions"),
        ("provincial", "Regions"),
        ("manila", "Metro Manila"),
        ("cebu", "Cebu"),
        ("davao", "Davao"),
        ("politics", "Politics"),
        ("government", "Politics"),
        ("health", "Health"),
        ("environment", "Environment"),
        ("weather", "Weather"),
    ])
});

/// Resolve `(normalized, raw)` category for a parsed document (§4.2).
/// Priority: structured data (JSON-LD `articleSection`) → meta tags
/// (`article:section`, `section`, `category`) → breadcrumb elements → first
/// allowed URL path segment. `"General"` when nothing resolves.
pub fn resolve(doc: &FetchedDocument, url: &str) -> (String, String) {
    if let Some(raw) = from_structured_data(doc) {
        return (normalize(&raw), raw);
    }
    if let Some(raw) = from_meta_tags(doc) {
        return (normalize(&raw), raw);
    }
    if let Some(raw) = from_breadcrumbs(doc) {
        return (normalize(&raw), raw);
    }
    if let Some(raw) = from_url_segment(url) {
        return (normalize(&raw), raw);
    }
    ("General".to_string(), String::new())
}

fn from_structured_data(doc: &FetchedDocument) -> Option<String> {
    for block in doc.ld_json() {
        if let Some(section) = find_article_section(&block) {
            return Some(section);
        }
    }
    None
}

fn find_article_section(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(s) = map.get("articleSection") {
                if let Some(s) = s.as_str() {
                    return Some(s.to_string());
                }
                if let Some(arr) = s.as_array() {
                    if let Some(first) = arr.first().and_then(|v| v.as_str()) {
                        return Some(first.to_string());
                    }
                }
            }
            if let Some(graph) = map.get("@graph").and_then(|g| g.as_array()) {
                for entry in graph {
                    if let Some(found) = find_article_section(entry) {
                        return Some(found);
                    }
                }
            }
            None
        }
        serde_json::Value::Array(items) => items.iter().find_map(find_article_section),
        _ => None,
    }
}

fn from_meta_tags(doc: &FetchedDocument) -> Option<String> {
    doc.meta_property("article:section")
        .or_else(|| doc.meta_name("section"))
        .or_else(|| doc.meta_name("category"))
        .filter(|s| !s.trim().is_empty())
}

fn from_breadcrumbs(doc: &FetchedDocument) -> Option<String> {
    let container = BREADCRUMB_RE.captures(&doc.html)?;
    let items: Vec<String> = BREADCRUMB_ITEM_RE
        .captures_iter(&container[1])
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    // First item is usually "Home"; the category is typically the next one.
    items.into_iter().nth(1)
}

fn from_url_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .map(|s| s.to_lowercase())
        .find(|s| !s.is_empty() && !BLACKLIST.contains(&s.as_str()))
}

fn normalize(raw: &str) -> String {
    let key = raw.trim().to_lowercase().replace(' ', "-");
    if let Some(mapped) = NORMALIZE.get(key.as_str()) {
        return mapped.to_string();
    }
    if raw.trim().is_empty() {
        return "General".to_string();
    }
    title_case(raw.trim())
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_data_wins_over_everything() {
        let doc = FetchedDocument::new(
            "u",
            r#"<script type="application/ld+json">{"articleSection":"tech"}</script>
               <meta property="article:section" content="Business">"#,
        );
        let (norm, raw) = resolve(&doc, "https://x.com/business/article-1");
        assert_eq!(raw, "tech");
        assert_eq!(norm, "Technology");
    }

    #[test]
    fn meta_tag_used_when_no_structured_data() {
        let doc =
            FetchedDocument::new("u", r#"<meta property="article:section" content="Headlines">"#);
        let (norm, _) = resolve(&doc, "https://x.com/a");
        assert_eq!(norm, "Headlines");
    }

    #[test]
    fn falls_back_to_url_segment_skipping_blacklist() {
        let doc = FetchedDocument::new("u", "<html></html>");
        let (norm, raw) = resolve(&doc, "https://x.com/tag/business/article-1");
        assert_eq!(raw, "business");
        assert_eq!(norm, "Business");
    }

    #[test]
    fn unknown_token_is_title_cased() {
        let doc = FetchedDocument::new("u", "<html></html>");
        let (norm, raw) = resolve(&doc, "https://x.com/showbiz/story");
        assert_eq!(raw, "showbiz");
        assert_eq!(norm, "Showbiz");
    }

    #[test]
    fn nothing_resolves_to_general() {
        let doc = FetchedDocument::new("u", "<html></html>");
        let (norm, raw) = resolve(&doc, "https://x.com/");
        assert_eq!(norm, "General");
        assert_eq!(raw, "");
    }

    #[test]
    fn breadcrumb_used_when_no_meta_or_structured_data() {
        let doc = FetchedDocument::new(
            "u",
            r#"<nav class="breadcrumb"><a href="/">Home</a><a href="/nation">Nation</a></nav>"#,
        );
        let (norm, raw) = resolve(&doc, "https://x.com/nation/story-1");
        assert_eq!(raw, "Nation");
        assert_eq!(norm, "Nation");
    }
}
