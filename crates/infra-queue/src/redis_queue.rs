//! Redis-backed work queue.
//!
//! One Redis list per topic: payloads are LPUSHed by producers and BRPOPed
//! by consumers, giving FIFO delivery with competing consumers. The
//! connection manager handles reconnection; a subscription is just another
//! handle onto the same managed connection.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

use scrapeflow_core::application::constants::RECEIVE_POLL_TIMEOUT;
use scrapeflow_core::port::queue::{QueueError, QueueSubscription, WorkQueue};

/// Work queue over a Redis list per topic
pub struct RedisWorkQueue {
    redis: ConnectionManager,
}

impl RedisWorkQueue {
    /// Connect to the broker
    ///
    /// # Errors
    /// Returns `QueueError::Connect` if the broker is unreachable.
    pub async fn connect(broker_url: &str) -> Result<Self, QueueError> {
        let client =
            redis::Client::open(broker_url).map_err(|e| QueueError::Connect(e.to_string()))?;

        let redis = ConnectionManager::new(client)
            .await
            .map_err(|e| QueueError::Connect(e.to_string()))?;

        debug!(broker = %broker_url, "Queue connection established");
        Ok(Self { redis })
    }

    /// Build a queue from an existing managed connection
    pub fn from_connection(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl WorkQueue for RedisWorkQueue {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), QueueError> {
        let mut conn = self.redis.clone();
        conn.lpush::<_, _, ()>(topic, payload)
            .await
            .map_err(|e| QueueError::Send(e.to_string()))?;
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<Box<dyn QueueSubscription>, QueueError> {
        Ok(Box::new(RedisSubscription {
            redis: self.redis.clone(),
            topic: topic.to_string(),
        }))
    }
}

struct RedisSubscription {
    redis: ConnectionManager,
    topic: String,
}

#[async_trait]
impl QueueSubscription for RedisSubscription {
    async fn next_message(&mut self) -> Result<Option<String>, QueueError> {
        let timeout_secs = RECEIVE_POLL_TIMEOUT.as_secs().max(1) as usize;

        // BRPOP blocks up to the poll window and returns (key, value)
        let popped: Option<(String, String)> = redis::cmd("BRPOP")
            .arg(&self.topic)
            .arg(timeout_secs)
            .query_async(&mut self.redis)
            .await
            .map_err(|e| QueueError::Receive(e.to_string()))?;

        Ok(popped.map(|(_, payload)| payload))
    }
}
