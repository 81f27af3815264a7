use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use newsdesk_common::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newsdesk=info".parse()?))
        .init();

    let config = Config::migrate_from_env();
    config.log_redacted();

    let pool = sqlx::PgPool::connect(&config.database_url).await?;
    newsdesk_store::migrate(&pool).await?;

    info!("migrations applied");
    Ok(())
}
