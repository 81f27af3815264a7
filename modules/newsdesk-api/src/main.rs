use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use newsdesk_common::Config;
use newsdesk_queue::QueueClient;
use newsdesk_scrape::SourceRegistry;
use newsdesk_store::{ArticleStore, RunLogStore};

mod auth;
mod error;
mod handlers;

/// Shared state for the read-API's normative subset (§6.R): nothing here
/// is the cache layer the full API surface would add — that collaborator
/// is explicitly out of scope (§1).
pub struct AppState {
    pub queue: QueueClient,
    pub registry: Arc<SourceRegistry>,
    pub articles: ArticleStore,
    pub run_log: RunLogStore,
    pub config: Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newsdesk=info".parse()?))
        .init();

    let config = Config::api_from_env();
    config.log_redacted();

    let pool = sqlx::PgPool::connect(&config.database_url).await?;
    let queue = QueueClient::connect(&config.redis_url).await?;
    let registry = Arc::new(SourceRegistry::default_sources());
    let articles = ArticleStore::new(pool.clone());
    let run_log = RunLogStore::new(pool.clone());

    let state = Arc::new(AppState {
        queue,
        registry,
        articles,
        run_log,
        config: config.clone(),
    });

    let app = Router::new()
        .route("/", get(handlers::health))
        .route("/scrape/run", post(handlers::scrape_run))
        .route("/ml/analyze", post(handlers::ml_analyze))
        .route("/scrape/status/{task_id}", get(handlers::scrape_status))
        .route("/logs/recent", get(handlers::logs_recent))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("newsdesk-api listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
