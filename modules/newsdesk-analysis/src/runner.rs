use std::sync::Arc;
use std::time::Duration;

use newsdesk_common::{ModelType, SentimentLabel};
use newsdesk_store::{ArticleStore, BiasAnalysisRow, BiasAnalysisStore};
use rand::Rng;
use tracing::{info, warn};

use crate::bias;
use crate::error::{AnalysisError, Result};
use crate::lexicon::LexiconLoader;
use crate::sentiment;

/// §4.8 model_version constants.
pub const SENTIMENT_MODEL_VERSION: &str = "sentiment_v1";
pub const POLITICAL_MODEL_VERSION: &str = "political_v1";

/// §7 retry policy, shared with per-URL scrape retries.
const BASE_DELAY: Duration = Duration::from_secs(3);
const MAX_ATTEMPTS: u32 = 3;

/// Outcome of one analysis run over a batch of article IDs.
#[derive(Debug, Default)]
pub struct AnalysisOutcome {
    pub analyzed: Vec<i64>,
    pub errors: Vec<(i64, String)>,
}

/// Orchestrates the four-step sentiment + political-bias flow (C11): load
/// article content, score it with both models, upsert one row per model
/// type keyed by `(article_id, model_version, model_type)`.
pub struct AnalysisRunner {
    articles: ArticleStore,
    bias_store: BiasAnalysisStore,
    lexicon: Arc<LexiconLoader>,
}

impl AnalysisRunner {
    pub fn new(articles: ArticleStore, bias_store: BiasAnalysisStore, lexicon: Arc<LexiconLoader>) -> Self {
        Self {
            articles,
            bias_store,
            lexicon,
        }
    }

    pub async fn run(&self, article_ids: &[i64]) -> Result<AnalysisOutcome> {
        let mut outcome = AnalysisOutcome::default();
        if article_ids.is_empty() {
            return Ok(outcome);
        }

        let articles = self.articles.by_ids(article_ids).await?;
        let lexicon = self.lexicon.current();

        for article in articles {
            let Some(content) = article.content.as_deref().filter(|c| !c.trim().is_empty()) else {
                warn!(article_id = article.id, "skipping analysis: no content");
                outcome
                    .errors
                    .push((article.id, AnalysisError::NoContent(article.id).to_string()));
                continue;
            };

            let sentiment = sentiment::analyze(content);
            let bias_result = bias::analyze(content, &lexicon, sentiment.compound);

            let sentiment_row = BiasAnalysisRow {
                article_id: article.id,
                model_version: SENTIMENT_MODEL_VERSION.to_string(),
                model_type: ModelType::Sentiment.as_str().to_string(),
                sentiment_score: Some(sentiment.compound),
                sentiment_label: Some(label_str(sentiment.label).to_string()),
                political_bias_score: None,
                confidence_score: None,
                processing_time_ms: sentiment.processing_time_ms,
                model_metadata: sentiment.model_metadata(),
            };

            let bias_row = BiasAnalysisRow {
                article_id: article.id,
                model_version: POLITICAL_MODEL_VERSION.to_string(),
                model_type: ModelType::PoliticalBias.as_str().to_string(),
                sentiment_score: None,
                sentiment_label: None,
                political_bias_score: Some(bias_result.bias_score),
                confidence_score: Some(bias_result.confidence),
                processing_time_ms: bias_result.processing_time_ms,
                model_metadata: bias_result.model_metadata(&lexicon.version),
            };

            match self.upsert_with_retry(&sentiment_row).await.and(self.upsert_with_retry(&bias_row).await) {
                Ok(()) => {
                    info!(article_id = article.id, "analysis stored");
                    outcome.analyzed.push(article.id);
                }
                Err(e) => {
                    warn!(article_id = article.id, error = %e, "analysis upsert failed, retries exhausted");
                    outcome.errors.push((article.id, e.to_string()));
                }
            }
        }

        Ok(outcome)
    }

    async fn upsert_with_retry(&self, row: &BiasAnalysisRow) -> Result<()> {
        let mut attempt = 0u32;
        loop {
            match self.bias_store.upsert(row).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt + 1 < MAX_ATTEMPTS => {
                    let jitter = Duration::from_millis(rand::rng().random_range(0..1000));
                    let delay = BASE_DELAY * 3u32.pow(attempt) + jitter;
                    warn!(attempt, error = %e, "analysis upsert failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn label_str(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "positive",
        SentimentLabel::Neutral => "neutral",
        SentimentLabel::Negative => "negative",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_version_constants_match_spec() {
        assert_eq!(SENTIMENT_MODEL_VERSION, "sentiment_v1");
        assert_eq!(POLITICAL_MODEL_VERSION, "political_v1");
    }

    #[test]
    fn label_str_matches_serde_rename() {
        assert_eq!(label_str(SentimentLabel::Positive), "positive");
        assert_eq!(label_str(SentimentLabel::Negative), "negative");
        assert_eq!(label_str(SentimentLabel::Neutral), "neutral");
    }
}
