use crate::client::QueueClient;
use crate::error::Result;
use crate::message::QueueMessage;

/// Publishes one `ml.analyze` message per successful store batch (C14).
/// Called only from the store+dedup success path, never inline with
/// analysis itself.
#[derive(Clone)]
pub struct TriggerBridge {
    client: QueueClient,
}

impl TriggerBridge {
    pub fn new(client: QueueClient) -> Self {
        Self { client }
    }

    /// No-ops on an empty slice; otherwise publishes exactly one message
    /// carrying all the given IDs.
    pub async fn on_inserted(&self, inserted_ids: &[i64]) -> Result<()> {
        if inserted_ids.is_empty() {
            return Ok(());
        }
        let message = QueueMessage::MlAnalyze {
            article_ids: inserted_ids.to_vec(),
        };
        self.client.publish(&message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_for_empty_batch_is_never_constructed() {
        let ids: &[i64] = &[];
        assert!(ids.is_empty());
    }
}
