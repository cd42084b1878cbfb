//! Consumer role body - fetches each delivered work item

use crate::application::constants::ERROR_RECOVERY_SLEEP_DURATION;
use crate::application::shutdown::ShutdownToken;
use crate::error::Result;
use crate::port::{PageFetcher, WorkQueue};
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{info, warn};

/// Per-worker consumer loop: one message at a time, one fetch per message
///
/// Throughput scales only by adding worker processes, not by concurrent
/// fetches within one worker.
pub struct ConsumerLoop {
    queue: Arc<dyn WorkQueue>,
    fetcher: Arc<dyn PageFetcher>,
    topic: String,
}

impl ConsumerLoop {
    pub fn new(
        queue: Arc<dyn WorkQueue>,
        fetcher: Arc<dyn PageFetcher>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            queue,
            fetcher,
            topic: topic.into(),
        }
    }

    /// Consume until shutdown, then disconnect and return
    ///
    /// No error escapes the per-item handler: a failed fetch is logged and
    /// the loop continues with the next message. A failed subscribe is
    /// retried after a recovery sleep rather than ending the worker.
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<()> {
        info!(topic = %self.topic, "Consumer started");

        let mut subscription = loop {
            if shutdown.is_shutdown() {
                info!("Consumer shutting down before subscribe");
                return Ok(());
            }
            match self.queue.subscribe(&self.topic).await {
                Ok(sub) => {
                    info!(topic = %self.topic, "Consumer subscribed");
                    break sub;
                }
                Err(e) => {
                    warn!(error = %e, "Subscribe failed, retrying");
                    tokio::select! {
                        _ = sleep(ERROR_RECOVERY_SLEEP_DURATION) => {},
                        _ = shutdown.wait() => {
                            info!("Consumer shutting down before subscribe");
                            return Ok(());
                        }
                    }
                }
            }
        };

        loop {
            tokio::select! {
                message = subscription.next_message() => {
                    match message {
                        Ok(Some(url)) => self.handle_item(&url).await,
                        Ok(None) => {} // idle poll window, go around
                        Err(e) => {
                            warn!(error = %e, "Receive failed");
                            tokio::select! {
                                _ = sleep(ERROR_RECOVERY_SLEEP_DURATION) => {},
                                _ = shutdown.wait() => break,
                            }
                        }
                    }
                }
                _ = shutdown.wait() => break,
            }
        }

        info!("Consumer stopped");
        Ok(())
    }

    async fn handle_item(&self, url: &str) {
        if url.is_empty() {
            warn!("Received empty payload");
            return;
        }

        info!(url = %url, "Received");
        match self.fetcher.fetch(url).await {
            Ok(summary) => {
                info!(url = %summary.url, title = ?summary.title, "Scraped page");
            }
            Err(e) => {
                warn!(error = %e, "Scrape failed");
            }
        }
    }
}
