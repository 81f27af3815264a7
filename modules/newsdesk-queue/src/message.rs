use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire envelope for both queues (§6.R). `MlAnalyzeSince` is only ever
/// produced by the API layer and expanded to concrete IDs before publish;
/// the analysis runner never consumes it directly.
///
/// `Scrape.correlation_id` carries the API-generated `task_id` from
/// `POST /scrape/run` through to the worker's `start_run` call, so that the
/// `run_id` it surfaces is the exact value `GET /scrape/status/{task_id}`
/// looks up (§4.11, §6.R). Ticks the scheduler dispatches on its own never
/// set it; the worker mints a fresh `run_id` in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueueMessage {
    Scrape {
        source: String,
        #[serde(default)]
        correlation_id: Option<Uuid>,
    },
    MlAnalyze { article_ids: Vec<i64> },
    MlAnalyzeSince { since: DateTime<Utc> },
}

impl QueueMessage {
    /// The Redis list key this message type is pushed to and popped from.
    pub fn queue_key(&self) -> &'static str {
        match self {
            QueueMessage::Scrape { .. } => "queue:scrape",
            QueueMessage::MlAnalyze { .. } | QueueMessage::MlAnalyzeSince { .. } => "queue:ml.analyze",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrape_and_analyze_route_to_distinct_keys() {
        let scrape = QueueMessage::Scrape { source: "rappler".to_string(), correlation_id: None };
        let analyze = QueueMessage::MlAnalyze { article_ids: vec![1, 2] };
        assert_eq!(scrape.queue_key(), "queue:scrape");
        assert_eq!(analyze.queue_key(), "queue:ml.analyze");
    }

    #[test]
    fn serializes_with_tagged_enum_shape() {
        let msg = QueueMessage::MlAnalyze { article_ids: vec![7] };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "ml_analyze");
        assert_eq!(value["article_ids"][0], 7);
    }
}
