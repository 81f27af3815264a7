pub mod canonicalize;
pub mod config;
pub mod error;
pub mod funds;
pub mod model;

pub use canonicalize::{canonicalize, CanonicalizeError};
pub use config::Config;
pub use error::NewsdeskError;
pub use funds::{classify_regex as classify_funds, FundsClassifier, CLASSIFIER_VERSION as FUNDS_CLASSIFIER_VERSION};
pub use model::*;

/// Content hash used for dedup/cache-key purposes across the pipeline.
///
/// ```
/// let a = newsdesk_common::content_hash("hello");
/// let b = newsdesk_common::content_hash("hello");
/// assert_eq!(a, b);
/// assert_ne!(a, newsdesk_common::content_hash("world"));
/// ```
pub fn content_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
