use newsdesk_common::RunHandle;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

#[derive(Clone)]
pub struct RunLogStore {
    pool: PgPool,
}

impl RunLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a `scraping_logs` row with `status=partial`. Exactly one
    /// `finalize_run` call is expected per `start_run` (§4.11).
    ///
    /// `run_id` is normally minted here, but when a caller already handed
    /// out a correlation token (the API's `task_id`, §6.R) it is passed
    /// through so the two stay identical.
    pub async fn start_run(&self, source: &str, run_id: Option<Uuid>) -> Result<RunHandle> {
        let run_id = run_id.unwrap_or_else(Uuid::new_v4);
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO scraping_logs (run_id, source, status, started_at)
            VALUES ($1, $2, 'partial', now())
            RETURNING id
            "#,
        )
        .bind(run_id)
        .bind(source)
        .fetch_one(&self.pool)
        .await?;

        Ok(RunHandle { id, run_id })
    }

    /// Transition `partial → success` or `partial → error`. No other
    /// transition is valid; callers are responsible for calling this
    /// exactly once per `start_run`.
    pub async fn finalize_run(
        &self,
        id: i64,
        status: RunStatus,
        articles_scraped: i32,
        error_message: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE scraping_logs
            SET status = $2,
                articles_scraped = $3,
                error_message = $4,
                completed_at = now(),
                execution_time_ms = EXTRACT(EPOCH FROM (now() - started_at)) * 1000
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(articles_scraped.max(0))
        .bind(error_message)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn recent(&self, source: Option<&str>, limit: i64) -> Result<Vec<newsdesk_common::ScrapingLog>> {
        let rows = match source {
            Some(source) => {
                sqlx::query_as::<_, newsdesk_common::ScrapingLog>(
                    "SELECT * FROM scraping_logs WHERE source = $1 ORDER BY started_at DESC LIMIT $2",
                )
                .bind(source)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, newsdesk_common::ScrapingLog>(
                    "SELECT * FROM scraping_logs ORDER BY started_at DESC LIMIT $1",
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    pub async fn by_run_id(&self, run_id: Uuid) -> Result<Option<newsdesk_common::ScrapingLog>> {
        let row = sqlx::query_as::<_, newsdesk_common::ScrapingLog>(
            "SELECT * FROM scraping_logs WHERE run_id = $1",
        )
        .bind(run_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

pub use newsdesk_common::RunStatus;

/// Guards a run so that cancellation before an explicit `finalize_run`
/// call still leaves exactly one finalize behind (§5 cancellation rule).
pub struct RunLogGuard<'a> {
    store: &'a RunLogStore,
    handle: RunHandle,
    finalized: bool,
}

impl<'a> RunLogGuard<'a> {
    pub fn new(store: &'a RunLogStore, handle: RunHandle) -> Self {
        Self {
            store,
            handle,
            finalized: false,
        }
    }

    pub fn handle(&self) -> RunHandle {
        self.handle
    }

    pub async fn finalize(
        mut self,
        status: RunStatus,
        articles_scraped: i32,
        error_message: Option<&str>,
    ) -> Result<()> {
        self.finalized = true;
        self.store
            .finalize_run(self.handle.id, status, articles_scraped, error_message)
            .await
    }
}

impl Drop for RunLogGuard<'_> {
    fn drop(&mut self) {
        if !self.finalized {
            let store = self.store.clone();
            let id = self.handle.id;
            tokio::spawn(async move {
                let _ = store
                    .finalize_run(id, RunStatus::Error, 0, Some("cancelled"))
                    .await;
            });
        }
    }
}
