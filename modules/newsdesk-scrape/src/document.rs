use std::sync::LazyLock;

use regex::Regex;

/// A fetched, unparsed HTML page plus the URL it was fetched from (which may
/// differ from the requested URL after redirects).
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub url: String,
    pub html: String,
}

static META_PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\s+[^>]*property\s*=\s*["']([^"']+)["'][^>]*content\s*=\s*["']([^"']*)["'][^>]*>"#)
        .expect("valid regex")
});

static META_PROPERTY_REV_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\s+[^>]*content\s*=\s*["']([^"']*)["'][^>]*property\s*=\s*["']([^"']+)["'][^>]*>"#)
        .expect("valid regex")
});

static META_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\s+[^>]*name\s*=\s*["']([^"']+)["'][^>]*content\s*=\s*["']([^"']*)["'][^>]*>"#)
        .expect("valid regex")
});

static META_NAME_REV_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\s+[^>]*content\s*=\s*["']([^"']*)["'][^>]*name\s*=\s*["']([^"']+)["'][^>]*>"#)
        .expect("valid regex")
});

static LDJSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

static TITLE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"));

impl FetchedDocument {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    /// Look up an `og:*`/`article:*` style `<meta property="...">` tag,
    /// attribute order-insensitive.
    pub fn meta_property(&self, key: &str) -> Option<String> {
        for cap in META_PROPERTY_RE.captures_iter(&self.html) {
            if cap[1].eq_ignore_ascii_case(key) {
                return Some(unescape_entities(&cap[2]));
            }
        }
        for cap in META_PROPERTY_REV_RE.captures_iter(&self.html) {
            if cap[2].eq_ignore_ascii_case(key) {
                return Some(unescape_entities(&cap[1]));
            }
        }
        None
    }

    /// Look up a `<meta name="...">` tag (e.g. `section`, `category`).
    pub fn meta_name(&self, key: &str) -> Option<String> {
        for cap in META_NAME_RE.captures_iter(&self.html) {
            if cap[1].eq_ignore_ascii_case(key) {
                return Some(unescape_entities(&cap[2]));
            }
        }
        for cap in META_NAME_REV_RE.captures_iter(&self.html) {
            if cap[2].eq_ignore_ascii_case(key) {
                return Some(unescape_entities(&cap[1]));
            }
        }
        None
    }

    /// All embedded `application/ld+json` blocks, parsed as loose JSON
    /// values. Malformed blocks are skipped rather than failing the page.
    pub fn ld_json(&self) -> Vec<serde_json::Value> {
        LDJSON_RE
            .captures_iter(&self.html)
            .filter_map(|cap| serde_json::from_str(cap[1].trim()).ok())
            .collect()
    }

    /// `<title>` tag contents, HTML-unescaped and whitespace-trimmed.
    pub fn title_tag(&self) -> Option<String> {
        TITLE_TAG_RE
            .captures(&self.html)
            .map(|cap| unescape_entities(cap[1].trim()))
    }
}

fn unescape_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_og_type() {
        let doc = FetchedDocument::new(
            "https://x.com/a",
            r#"<html><head><meta property="og:type" content="article"></head></html>"#,
        );
        assert_eq!(doc.meta_property("og:type"), Some("article".to_string()));
    }

    #[test]
    fn reads_article_section() {
        let doc = FetchedDocument::new(
            "https://x.com/a",
            r#"<meta property="article:section" content="Nation &amp; World">"#,
        );
        assert_eq!(
            doc.meta_property("article:section"),
            Some("Nation & World".to_string())
        );
    }

    #[test]
    fn reads_meta_name_reversed_attr_order() {
        let doc = FetchedDocument::new("u", r#"<meta content="Business" name="category">"#);
        assert_eq!(doc.meta_name("category"), Some("Business".to_string()));
    }

    #[test]
    fn parses_ld_json() {
        let doc = FetchedDocument::new(
            "u",
            r#"<script type="application/ld+json">{"articleSection":"Technology"}</script>"#,
        );
        let blocks = doc.ld_json();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0]["articleSection"], "Technology");
    }

    #[test]
    fn missing_meta_returns_none() {
        let doc = FetchedDocument::new("u", "<html></html>");
        assert_eq!(doc.meta_property("og:type"), None);
    }

    #[test]
    fn title_tag_is_trimmed_and_unescaped() {
        let doc = FetchedDocument::new("u", "<title>  A &amp; B  </title>");
        assert_eq!(doc.title_tag(), Some("A & B".to_string()));
    }
}
