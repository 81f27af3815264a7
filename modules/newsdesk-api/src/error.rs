use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failure modes surfaced to API clients. Kept distinct from the pipeline
/// crates' error enums — this one maps directly onto HTTP status codes
/// rather than retry classification (§7 is a worker concern, not this
/// crate's).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("unknown source: {0}")]
    UnknownSource(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] newsdesk_store::StoreError),

    #[error(transparent)]
    Queue(#[from] newsdesk_queue::QueueError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::UnknownSource(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Queue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
