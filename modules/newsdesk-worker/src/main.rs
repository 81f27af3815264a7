use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Semaphore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use newsdesk_analysis::{AnalysisRunner, LexiconLoader};
use newsdesk_common::Config;
use newsdesk_queue::{QueueClient, QueueMessage, TriggerBridge};
use newsdesk_scrape::SourceRegistry;
use newsdesk_store::{ArticleStore, BiasAnalysisStore, RunLogStore};
use newsdesk_worker::{
    default_schedules, run_analysis_consumer, run_scrape_task, run_source_schedule,
    SchedulerHandle, MAX_CONCURRENT_SCRAPES,
};

/// Wires C7/C11/C12 together (§2 control flow): the scheduler dispatches
/// one `scrape.<source>` message per source on its staggered interval, a
/// small pool of tasks consumes `queue:scrape`, and a single consumer
/// drains `queue:ml.analyze` as the trigger bridge publishes to it.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newsdesk=info".parse()?))
        .init();

    let config = Config::worker_from_env();
    config.log_redacted();

    let pool = sqlx::PgPool::connect(&config.database_url).await?;
    newsdesk_store::migrate(&pool).await?;

    let queue = QueueClient::connect(&config.redis_url).await?;
    let registry = Arc::new(SourceRegistry::default_sources_with_browserless(
        config.browserless_url.as_deref(),
        config.browserless_token.as_deref(),
    ));
    let run_log = RunLogStore::new(pool.clone());
    let articles = ArticleStore::new(pool.clone());
    let bias_store = BiasAnalysisStore::new(pool.clone());
    let trigger = TriggerBridge::new(queue.clone());
    let lexicon = Arc::new(LexiconLoader::load(None)?);
    let analysis_runner = AnalysisRunner::new(articles.clone(), bias_store, lexicon);

    let scheduler_handle = SchedulerHandle::new();
    let permits = Arc::new(Semaphore::new(MAX_CONCURRENT_SCRAPES));

    // One task per source dispatches a `scrape.<source>` queue message on
    // its own staggered interval (§4.7); a separate small pool of workers
    // consumes that queue so scheduling stays decoupled from execution.
    let mut handles = Vec::new();
    for schedule in default_schedules() {
        let queue = queue.clone();
        let handle = scheduler_handle.clone();
        handles.push(tokio::spawn(run_source_schedule(schedule, handle, move |source| {
            let queue = queue.clone();
            async move {
                let message = QueueMessage::Scrape { source: source.to_string(), correlation_id: None };
                if let Err(e) = queue.publish(&message).await {
                    tracing::error!(source, error = %e, "failed to publish scrape tick");
                }
            }
        })));
    }

    for worker_id in 0..MAX_CONCURRENT_SCRAPES {
        let queue = queue.clone();
        let registry = registry.clone();
        let run_log = run_log.clone();
        let articles = articles.clone();
        let trigger = trigger.clone();
        let permits = permits.clone();
        let handle = scheduler_handle.clone();
        handles.push(tokio::spawn(async move {
            info!(worker_id, "scrape consumer started");
            loop {
                if handle.is_stopped().await {
                    return;
                }
                let message = match queue.pop("queue:scrape", 5.0).await {
                    Ok(Some(message)) => message,
                    Ok(None) => continue,
                    Err(e) => {
                        tracing::error!(error = %e, "queue pop failed");
                        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                        continue;
                    }
                };
                let QueueMessage::Scrape { source, correlation_id } = message else {
                    tracing::warn!("received a non-scrape message on the scrape queue");
                    continue;
                };
                run_scrape_task(
                    &source,
                    correlation_id,
                    registry.clone(),
                    run_log.clone(),
                    articles.clone(),
                    trigger.clone(),
                    permits.clone(),
                )
                .await;
            }
        }));
    }

    handles.push(tokio::spawn(run_analysis_consumer(
        queue.clone(),
        analysis_runner,
        scheduler_handle.clone(),
    )));

    info!("worker started: {} sources scheduled, {} scrape consumers", default_schedules().len(), MAX_CONCURRENT_SCRAPES);

    for handle in handles {
        let _ = handle.await;
    }

    Ok(())
}
