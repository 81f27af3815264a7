use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A collected news item, keyed by its canonicalized URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: i64,
    pub source: String,
    pub category: String,
    pub raw_category: String,
    pub title: String,
    pub content: Option<String>,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub is_funds: bool,
    pub inserted_at: DateTime<Utc>,
}

/// An article as produced by a source adapter, before URL canonicalization
/// and `is_funds` classification happen at insert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedArticle {
    pub source: String,
    pub category: String,
    pub raw_category: String,
    pub title: String,
    pub content: Option<String>,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    Sentiment,
    PoliticalBias,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Sentiment => "sentiment",
            ModelType::PoliticalBias => "political_bias",
        }
    }
}

impl std::str::FromStr for ModelType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sentiment" => Ok(Self::Sentiment),
            "political_bias" => Ok(Self::PoliticalBias),
            other => Err(format!("unknown model_type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

/// The classifier's output space is exactly these three values. The
/// `"mixed"` bucket surfaced by some downstream aggregation is never
/// assigned by the analyzer itself and is not modeled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    ProGovernment,
    ProOpposition,
    Neutral,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::ProGovernment => "pro_government",
            Direction::ProOpposition => "pro_opposition",
            Direction::Neutral => "neutral",
        }
    }
}

/// One analytic assertion about an article under one (model_version, model_type) key.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BiasAnalysis {
    pub id: i64,
    pub article_id: i64,
    pub model_version: String,
    pub model_type: String,
    pub sentiment_score: Option<f64>,
    pub sentiment_label: Option<String>,
    pub political_bias_score: Option<f64>,
    pub toxicity_score: Option<f64>,
    pub confidence_score: Option<f64>,
    pub processing_time_ms: i32,
    pub model_metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Partial,
    Success,
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Partial => "partial",
            RunStatus::Success => "success",
            RunStatus::Error => "error",
        }
    }
}

/// One row per scrape attempt.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScrapingLog {
    pub id: i64,
    pub run_id: Uuid,
    pub source: String,
    pub status: String,
    pub articles_scraped: i32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub execution_time_ms: Option<i32>,
    pub error_message: Option<String>,
}

/// Handle returned by `start_run`, surfaced to callers for correlation.
#[derive(Debug, Clone, Copy)]
pub struct RunHandle {
    pub id: i64,
    pub run_id: Uuid,
}
