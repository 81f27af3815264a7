use url::Url;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CanonicalizeError {
    #[error("URL could not be parsed: {0}")]
    Unparseable(String),
    #[error("URL has no host")]
    MissingHost,
}

/// Deterministic URL normalization used as the natural dedup key.
///
/// Lowercases the host, drops query and fragment, defaults an empty path to
/// `/`, trims one trailing slash unless the path is exactly `/`. Scheme and
/// path case are otherwise preserved, since news URLs are case-sensitive in
/// practice. Idempotent: `canonicalize(canonicalize(u)) == canonicalize(u)`.
pub fn canonicalize(raw: &str) -> Result<String, CanonicalizeError> {
    let mut url =
        Url::parse(raw).map_err(|_| CanonicalizeError::Unparseable(raw.to_string()))?;

    if url.host_str().is_none() {
        return Err(CanonicalizeError::MissingHost);
    }

    let host = url.host_str().unwrap().to_lowercase();
    url.set_host(Some(&host))
        .map_err(|_| CanonicalizeError::Unparseable(raw.to_string()))?;

    url.set_query(None);
    url.set_fragment(None);

    let path = url.path();
    let new_path = if path.is_empty() {
        "/".to_string()
    } else if path != "/" && path.ends_with('/') {
        path.trim_end_matches('/').to_string()
    } else {
        path.to_string()
    };
    url.set_path(&new_path);

    Ok(restore_scheme_case(raw, &url.to_string()))
}

/// `Url` lowercases the scheme on parse; rule 6 (§4.1) requires the input's
/// scheme case to be preserved, so splice the original casing back in.
fn restore_scheme_case(raw: &str, canonical: &str) -> String {
    let (Some(raw_colon), Some(canon_colon)) = (raw.find(':'), canonical.find(':')) else {
        return canonical.to_string();
    };
    let raw_scheme = &raw[..raw_colon];
    let is_scheme_token = raw_scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && raw_scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if is_scheme_token && canonical[..canon_colon].eq_ignore_ascii_case(raw_scheme) {
        format!("{raw_scheme}{}", &canonical[canon_colon..])
    } else {
        canonical.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_host() {
        assert_eq!(
            canonicalize("https://EXAMPLE.com/a").unwrap(),
            "https://example.com/a"
        );
    }

    #[test]
    fn drops_query_and_fragment() {
        assert_eq!(
            canonicalize("https://x.com/a/1?utm=x#frag").unwrap(),
            "https://x.com/a/1"
        );
    }

    #[test]
    fn trims_one_trailing_slash() {
        assert_eq!(
            canonicalize("https://x.com/a/1/").unwrap(),
            "https://x.com/a/1"
        );
    }

    #[test]
    fn root_path_kept_as_slash() {
        assert_eq!(canonicalize("https://x.com").unwrap(), "https://x.com/");
        assert_eq!(canonicalize("https://x.com/").unwrap(), "https://x.com/");
    }

    #[test]
    fn preserves_scheme_and_path_case() {
        assert_eq!(
            canonicalize("HTTPS://x.com/Path/ABC").unwrap(),
            "HTTPS://x.com/Path/ABC"
        );
    }

    #[test]
    fn rejects_missing_scheme() {
        assert!(canonicalize("x.com/a").is_err());
    }

    #[test]
    fn is_idempotent() {
        let raw = "https://X.com/a/1/?x=1#y";
        let once = canonicalize(raw).unwrap();
        let twice = canonicalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn dedup_scenario_from_spec() {
        let a = canonicalize("https://x.com/a/1?utm=x#frag").unwrap();
        let b = canonicalize("https://x.com/a/1/").unwrap();
        assert_eq!(a, b);
    }
}
