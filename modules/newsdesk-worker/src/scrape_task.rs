use std::sync::Arc;

use newsdesk_common::RunStatus;
use newsdesk_queue::TriggerBridge;
use newsdesk_scrape::{ScrapeRunner, SourceRegistry};
use newsdesk_store::{ArticleStore, RunLogGuard, RunLogStore};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Default number of concurrently running per-source scrape tasks (§5).
pub const MAX_CONCURRENT_SCRAPES: usize = 4;

/// How many articles a single run collects per source.
const MAX_ARTICLES_PER_RUN: usize = 20;

/// Runs one source end to end: start the run log, scrape, store, trigger
/// analysis, finalize. Acquires `permits` before doing any work so a burst
/// of simultaneous dispatches still serializes beyond the configured
/// concurrency (§5).
pub async fn run_scrape_task(
    source: &str,
    correlation_id: Option<Uuid>,
    registry: Arc<SourceRegistry>,
    run_log: RunLogStore,
    articles: ArticleStore,
    trigger: TriggerBridge,
    permits: Arc<Semaphore>,
) {
    let _permit = match permits.acquire().await {
        Ok(permit) => permit,
        Err(_) => return,
    };

    let Some(adapter) = registry.get(source) else {
        warn!(source, "scrape task dispatched for unknown source");
        return;
    };

    let handle = match run_log.start_run(source, correlation_id).await {
        Ok(handle) => handle,
        Err(e) => {
            error!(source, error = %e, "failed to start run log");
            return;
        }
    };

    let guard = RunLogGuard::new(&run_log, handle);
    info!(source, run_id = %handle.run_id, "scrape run started");

    let outcome = ScrapeRunner::run(adapter.as_ref(), MAX_ARTICLES_PER_RUN).await;
    let article_count = outcome.articles.len();

    let insert_result = articles.insert_articles(outcome.articles).await;

    match insert_result {
        Ok(result) => {
            if let Err(e) = trigger.on_inserted(&result.inserted_ids).await {
                warn!(source, error = %e, "failed to publish analysis trigger");
            }

            // The row starts `partial` (§4.11); a run that collected
            // anything at all still finalizes `success`, with per-URL
            // failures recorded in `error_message` rather than flipping
            // the overall status — `partial` is never a finalize target.
            let error_message = (!outcome.errors.is_empty())
                .then(|| format!("{} url error(s)", outcome.errors.len()));

            if let Err(e) = guard
                .finalize(RunStatus::Success, result.inserted as i32, error_message.as_deref())
                .await
            {
                error!(source, error = %e, "failed to finalize run log");
            }
            info!(source, inserted = result.inserted, skipped = result.skipped, "scrape run complete");
        }
        Err(e) => {
            error!(source, error = %e, "store+dedup failed, finalizing run as error");
            let _ = guard
                .finalize(RunStatus::Error, article_count as i32, Some(&e.to_string()))
                .await;
        }
    }
}
