pub mod articles;
pub mod bias_analysis;
pub mod error;
pub mod run_log;

pub use articles::{ArticleStore, InsertResult};
pub use bias_analysis::{BiasAnalysisRow, BiasAnalysisStore};
pub use error::{Result, StoreError};
pub use run_log::{RunLogGuard, RunLogStore, RunStatus};

use sqlx::PgPool;

/// Run the embedded SQL migrations against `pool`.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
