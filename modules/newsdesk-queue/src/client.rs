use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

use crate::error::Result;
use crate::message::QueueMessage;

/// Thin wrapper over a `ConnectionManager`, reused across publishes and
/// pops rather than reconnecting per call (§6.R).
#[derive(Clone)]
pub struct QueueClient {
    conn: ConnectionManager,
}

impl QueueClient {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }

    /// `LPUSH` the JSON-encoded message onto its routed list.
    pub async fn publish(&self, message: &QueueMessage) -> Result<()> {
        let payload = serde_json::to_string(message)?;
        let key = message.queue_key();
        let mut conn = self.conn.clone();
        let _: i64 = conn.lpush(key, payload).await?;
        debug!(key, "published queue message");
        Ok(())
    }

    /// Blocking pop from `key` with `timeout_secs`; `None` on timeout.
    pub async fn pop(&self, key: &str, timeout_secs: f64) -> Result<Option<QueueMessage>> {
        let mut conn = self.conn.clone();
        let reply: Option<(String, String)> = conn.brpop(key, timeout_secs).await?;
        match reply {
            Some((_, payload)) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_rejects_malformed_url() {
        // redis::Client::open validates scheme eagerly; a bad scheme never
        // reaches the network, so this is safe to assert without a broker.
        let err = redis::Client::open("not-a-url");
        assert!(err.is_err());
    }
}
