use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use newsdesk_queue::QueueMessage;

use crate::auth::require_admin;
use crate::error::{ApiError, Result};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ScrapeRunRequest {
    pub source: Option<String>,
    pub sources: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeRunJob {
    pub source: String,
    pub task_id: String,
}

/// `POST /scrape/run` (§6.R). Accepts both the singular `source` and
/// plural `sources` shape (§9); enqueues one `QueueMessage::Scrape` per
/// named source, or every registered source when neither is given. Each
/// job's `task_id` is the exact `run_id` the worker's `start_run` call
/// will surface (§4.11), threaded through `correlation_id` on the queue
/// message.
pub async fn scrape_run(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ScrapeRunRequest>,
) -> Result<impl IntoResponse> {
    require_admin(&headers, &state.config.admin_token)?;

    let sources: Vec<String> = match (body.source, body.sources) {
        (Some(s), _) => vec![s],
        (None, Some(sources)) if !sources.is_empty() => sources,
        (None, _) => state.registry.names().into_iter().map(str::to_string).collect(),
    };

    let mut jobs = Vec::with_capacity(sources.len());
    for source in sources {
        if state.registry.get(&source).is_none() {
            return Err(ApiError::UnknownSource(source));
        }
        let task_id = Uuid::new_v4();
        let message = QueueMessage::Scrape {
            source: source.clone(),
            correlation_id: Some(task_id),
        };
        state.queue.publish(&message).await?;
        jobs.push(ScrapeRunJob {
            source,
            task_id: task_id.to_string(),
        });
    }

    Ok(Json(json!({ "queued": true, "jobs": jobs })))
}

#[derive(Debug, Deserialize)]
pub struct MlAnalyzeRequest {
    pub article_ids: Option<Vec<i64>>,
    pub since: Option<DateTime<Utc>>,
}

/// `POST /ml/analyze` (§6.R). `since` is expanded to concrete article IDs
/// here, before publish — the analysis runner never consumes
/// `MlAnalyzeSince` directly (§4.12).
pub async fn ml_analyze(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<MlAnalyzeRequest>,
) -> Result<impl IntoResponse> {
    require_admin(&headers, &state.config.admin_token)?;

    let article_ids = match (body.article_ids, body.since) {
        (Some(ids), _) => ids,
        (None, Some(since)) => state.articles.ids_since(since).await?,
        (None, None) => {
            return Err(ApiError::BadRequest(
                "one of article_ids or since is required".to_string(),
            ))
        }
    };

    let task_id = Uuid::new_v4();
    let article_count = article_ids.len();
    if !article_ids.is_empty() {
        let message = QueueMessage::MlAnalyze { article_ids };
        state.queue.publish(&message).await?;
    }

    Ok(Json(json!({
        "queued": true,
        "task_id": task_id.to_string(),
        "article_count": article_count,
    })))
}

/// `GET /scrape/status/{task_id}` (§6.R). `task_id` is looked up directly
/// as a `scraping_logs.run_id`; an id with no row yet (enqueued but not
/// picked up) reports `pending` rather than 404, since the API has no way
/// to distinguish "not started" from "unknown" without a result backend.
pub async fn scrape_status(State(state): State<Arc<AppState>>, Path(task_id): Path<String>) -> Result<impl IntoResponse> {
    let Ok(run_id) = task_id.parse::<Uuid>() else {
        return Err(ApiError::BadRequest("task_id must be a UUID".to_string()));
    };

    let log = state.run_log.by_run_id(run_id).await?;
    let Some(log) = log else {
        return Ok(Json(json!({ "status": "pending" })));
    };

    let status = match log.status.as_str() {
        "partial" => "pending",
        "success" => "completed",
        "error" => "failed",
        other => other,
    };

    Ok(Json(json!({
        "status": status,
        "result": (status == "completed").then(|| json!({
            "articles_scraped": log.articles_scraped,
            "execution_time_ms": log.execution_time_ms,
        })),
        "error": log.error_message,
    })))
}

#[derive(Debug, Deserialize)]
pub struct RecentLogsQuery {
    pub source: Option<String>,
    pub limit: Option<i64>,
}

/// `GET /logs/recent?source=&limit=` (§6.R). Newest first, default limit
/// 50, no auth required (read-only projection of `scraping_logs`).
pub async fn logs_recent(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentLogsQuery>,
) -> Result<impl IntoResponse> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let rows = state.run_log.recent(query.source.as_deref(), limit).await?;
    Ok(Json(rows))
}

pub async fn health() -> &'static str {
    "ok"
}
