use newsdesk_common::BiasAnalysis;
use sqlx::PgPool;

use crate::error::Result;

#[derive(Clone)]
pub struct BiasAnalysisStore {
    pool: PgPool,
}

/// One row to persist for an (article, model_version, model_type) key.
/// Mirrors the `bias_analysis` columns that each model type actually
/// populates; the rest stay `NULL` (§6.R's `toxicity_score` note).
#[derive(Debug, Clone)]
pub struct BiasAnalysisRow {
    pub article_id: i64,
    pub model_version: String,
    pub model_type: String,
    pub sentiment_score: Option<f64>,
    pub sentiment_label: Option<String>,
    pub political_bias_score: Option<f64>,
    pub confidence_score: Option<f64>,
    pub processing_time_ms: i32,
    pub model_metadata: serde_json::Value,
}

impl BiasAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert keyed by `(article_id, model_version, model_type)` (§4.8).
    pub async fn upsert(&self, row: &BiasAnalysisRow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bias_analysis (
                article_id, model_version, model_type, sentiment_score,
                sentiment_label, political_bias_score, confidence_score,
                processing_time_ms, model_metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (article_id, model_version, model_type) DO UPDATE SET
                sentiment_score = EXCLUDED.sentiment_score,
                sentiment_label = EXCLUDED.sentiment_label,
                political_bias_score = EXCLUDED.political_bias_score,
                confidence_score = EXCLUDED.confidence_score,
                processing_time_ms = EXCLUDED.processing_time_ms,
                model_metadata = EXCLUDED.model_metadata
            "#,
        )
        .bind(row.article_id)
        .bind(&row.model_version)
        .bind(&row.model_type)
        .bind(row.sentiment_score)
        .bind(&row.sentiment_label)
        .bind(row.political_bias_score)
        .bind(row.confidence_score)
        .bind(row.processing_time_ms)
        .bind(&row.model_metadata)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn for_article(&self, article_id: i64) -> Result<Vec<BiasAnalysis>> {
        let rows = sqlx::query_as::<_, BiasAnalysis>(
            "SELECT * FROM bias_analysis WHERE article_id = $1 ORDER BY created_at DESC",
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
