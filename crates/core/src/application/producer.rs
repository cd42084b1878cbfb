//! Producer role body - publishes work items at a fixed cadence

use crate::application::constants::PUBLISH_INTERVAL;
use crate::application::shutdown::ShutdownToken;
use crate::error::Result;
use crate::port::WorkQueue;
use std::sync::Arc;
use tracing::{info, warn};

/// Per-worker producer loop: one URL onto the topic every second
pub struct ProducerLoop {
    queue: Arc<dyn WorkQueue>,
    topic: String,
    scrape_url: String,
}

impl ProducerLoop {
    pub fn new(
        queue: Arc<dyn WorkQueue>,
        topic: impl Into<String>,
        scrape_url: impl Into<String>,
    ) -> Self {
        Self {
            queue,
            topic: topic.into(),
            scrape_url: scrape_url.into(),
        }
    }

    /// Publish until shutdown, then disconnect and return
    ///
    /// A failed publish is logged; the next timer fire retries on its own.
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<()> {
        info!(topic = %self.topic, "Producer started");

        let mut interval = tokio::time::interval(PUBLISH_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.queue.publish(&self.topic, &self.scrape_url).await {
                        Ok(()) => info!(payload = %self.scrape_url, "Sent"),
                        Err(e) => warn!(error = %e, "Publish failed"),
                    }
                }
                _ = shutdown.wait() => {
                    info!("Producer shutting down");
                    break;
                }
            }
        }

        info!("Producer stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::shutdown::shutdown_channel;
    use crate::port::queue::mocks::MockWorkQueue;
    use std::time::Duration;

    #[tokio::test]
    async fn test_publishes_until_shutdown() {
        let queue = Arc::new(MockWorkQueue::new());
        let producer = ProducerLoop::new(queue.clone(), "scrape-requests", "https://example.org");
        let (tx, rx) = shutdown_channel();

        let task = tokio::spawn(async move { producer.run(rx).await });

        // The publish interval fires immediately on the first tick
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.shutdown();
        task.await.unwrap().unwrap();

        let published = queue.published();
        assert!(!published.is_empty());
        assert_eq!(
            published[0],
            ("scrape-requests".to_string(), "https://example.org".to_string())
        );
    }

    #[tokio::test]
    async fn test_publish_error_keeps_loop_alive() {
        let queue = Arc::new(MockWorkQueue::new());
        queue.set_fail_publish(true);
        let producer = ProducerLoop::new(queue.clone(), "scrape-requests", "https://example.org");
        let (tx, rx) = shutdown_channel();

        let task = tokio::spawn(async move { producer.run(rx).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!task.is_finished(), "publish failure must not end the loop");

        tx.shutdown();
        task.await.unwrap().unwrap();
        assert!(queue.published().is_empty());
    }
}
