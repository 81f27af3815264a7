use newsdesk_common::{canonicalize, classify_funds, Article, NormalizedArticle};
use serde::Serialize;
use sqlx::PgPool;
use tracing::warn;

use crate::error::Result;

const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct ArticleStore {
    pool: PgPool,
}

/// Result of a store+dedup batch (§4.6).
#[derive(Debug, Default, Serialize)]
pub struct InsertResult {
    pub checked: usize,
    pub skipped: usize,
    pub inserted: usize,
    pub inserted_ids: Vec<i64>,
    pub error: Option<String>,
}

struct CanonicalRow {
    url: String,
    article: NormalizedArticle,
}

impl ArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Canonicalize, dedup-check, classify, and insert a batch of freshly
    /// scraped articles. At most one stored row per canonical URL in
    /// steady state; a race between two runners resolves to a skip rather
    /// than failing the whole batch.
    pub async fn insert_articles(&self, articles: Vec<NormalizedArticle>) -> Result<InsertResult> {
        let mut result = InsertResult::default();

        let canonical: Vec<CanonicalRow> = articles
            .into_iter()
            .filter_map(|article| match canonicalize(&article.url) {
                Ok(url) => Some(CanonicalRow { url, article }),
                Err(e) => {
                    warn!(url = %article.url, error = %e, "skip reason: unparseable_url");
                    None
                }
            })
            .collect();

        result.checked = canonical.len();
        if canonical.is_empty() {
            return Ok(result);
        }

        let urls: Vec<&str> = canonical.iter().map(|c| c.url.as_str()).collect();
        let existing: Vec<String> = sqlx::query_scalar(
            "SELECT url FROM articles WHERE url = ANY($1)",
        )
        .bind(&urls[..])
        .fetch_all(&self.pool)
        .await?;
        let existing: std::collections::HashSet<String> = existing.into_iter().collect();

        let new_rows: Vec<&CanonicalRow> = canonical
            .iter()
            .filter(|c| !existing.contains(&c.url))
            .collect();
        result.skipped = canonical.len() - new_rows.len();

        if new_rows.is_empty() {
            return Ok(result);
        }

        match self.insert_batch(&new_rows).await {
            Ok(ids) => {
                result.inserted = ids.len();
                result.inserted_ids = ids;
            }
            Err(e) if is_unique_violation(&e) => {
                // A concurrent runner raced us on one or more URLs within this
                // batch. Fall back to per-row inserts so the rest still lands.
                let (ids, skipped) = self.insert_rows_individually(&new_rows).await;
                result.inserted = ids.len();
                result.inserted_ids = ids;
                result.skipped += skipped;
            }
            Err(e) => return Err(e.into()),
        }

        Ok(result)
    }

    async fn insert_batch(&self, rows: &[&CanonicalRow]) -> std::result::Result<Vec<i64>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            let is_funds = classify_funds(&row.article.title, row.article.content.as_deref());
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO articles (source, category, raw_category, title, content, url, published_at, is_funds)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id
                "#,
            )
            .bind(&row.article.source)
            .bind(&row.article.category)
            .bind(&row.article.raw_category)
            .bind(&row.article.title)
            .bind(&row.article.content)
            .bind(&row.url)
            .bind(row.article.published_at)
            .bind(is_funds)
            .fetch_one(&mut *tx)
            .await?;
            ids.push(id);
        }
        tx.commit().await?;
        Ok(ids)
    }

    async fn insert_rows_individually(&self, rows: &[&CanonicalRow]) -> (Vec<i64>, usize) {
        let mut ids = Vec::new();
        let mut skipped = 0;
        for row in rows {
            let is_funds = classify_funds(&row.article.title, row.article.content.as_deref());
            let inserted: std::result::Result<i64, sqlx::Error> = sqlx::query_scalar(
                r#"
                INSERT INTO articles (source, category, raw_category, title, content, url, published_at, is_funds)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id
                "#,
            )
            .bind(&row.article.source)
            .bind(&row.article.category)
            .bind(&row.article.raw_category)
            .bind(&row.article.title)
            .bind(&row.article.content)
            .bind(&row.url)
            .bind(row.article.published_at)
            .bind(is_funds)
            .fetch_one(&self.pool)
            .await;

            match inserted {
                Ok(id) => ids.push(id),
                Err(e) if is_unique_violation(&e) => {
                    skipped += 1;
                }
                Err(e) => warn!(url = %row.url, error = %e, "failed to insert article row"),
            }
        }
        (ids, skipped)
    }

    pub async fn by_ids(&self, ids: &[i64]) -> Result<Vec<Article>> {
        let rows = sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn ids_since(&self, since: chrono::DateTime<chrono::Utc>) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT id FROM articles WHERE inserted_at >= $1 ORDER BY inserted_at ASC",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e.as_database_error().and_then(|d| d.code()), Some(code) if code == PG_UNIQUE_VIOLATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_detection_ignores_other_codes() {
        // `sqlx::Error` isn't constructible outside the driver for a fake
        // DatabaseError, so this only documents the code we match on.
        assert_eq!(PG_UNIQUE_VIOLATION, "23505");
    }
}
