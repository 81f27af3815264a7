use axum::http::HeaderMap;

use crate::error::{ApiError, Result};

/// Bearer-token check against `ADMIN_TOKEN` (§6) for the mutating enqueue
/// endpoints. The read-only `/scrape/status` and `/logs/recent` endpoints
/// don't require it.
pub fn require_admin(headers: &HeaderMap, admin_token: &str) -> Result<()> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let presented = header.strip_prefix("Bearer ").unwrap_or("");
    if !admin_token.is_empty() && presented == admin_token {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}
