// Work queue port
// Abstraction over the external message broker (single FIFO topic)

use async_trait::async_trait;
use thiserror::Error;

/// Queue boundary errors, by operation kind
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("queue connect failed: {0}")]
    Connect(String),

    #[error("queue send failed: {0}")]
    Send(String),

    #[error("queue receive failed: {0}")]
    Receive(String),
}

/// Work queue port
///
/// Payloads are raw strings (URLs to scrape). Ordering is whatever the
/// broker provides; no delivery-guarantee contract beyond the broker's own.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    /// Publish one payload onto the topic
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), QueueError>;

    /// Open a subscription on the topic
    async fn subscribe(&self, topic: &str) -> Result<Box<dyn QueueSubscription>, QueueError>;
}

/// An open subscription delivering payloads one at a time
#[async_trait]
pub trait QueueSubscription: Send {
    /// Wait for the next payload
    ///
    /// Returns Ok(None) when no message arrived within the broker poll
    /// window; the caller just polls again.
    async fn next_message(&mut self) -> Result<Option<String>, QueueError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;

    /// Mock WorkQueue backed by an in-memory channel
    ///
    /// Tests feed the consumer side with `inject` and observe producer
    /// publishes through `published`.
    pub struct MockWorkQueue {
        published: Arc<Mutex<Vec<(String, String)>>>,
        inject_tx: mpsc::UnboundedSender<String>,
        inject_rx: Arc<Mutex<Option<mpsc::UnboundedReceiver<String>>>>,
        fail_publish: Arc<Mutex<bool>>,
    }

    impl MockWorkQueue {
        pub fn new() -> Self {
            let (inject_tx, inject_rx) = mpsc::unbounded_channel();
            Self {
                published: Arc::new(Mutex::new(Vec::new())),
                inject_tx,
                inject_rx: Arc::new(Mutex::new(Some(inject_rx))),
                fail_publish: Arc::new(Mutex::new(false)),
            }
        }

        /// Queue a payload for delivery to the subscriber
        pub fn inject(&self, payload: impl Into<String>) {
            let _ = self.inject_tx.send(payload.into());
        }

        pub fn set_fail_publish(&self, fail: bool) {
            *self.fail_publish.lock().unwrap() = fail;
        }

        pub fn published(&self) -> Vec<(String, String)> {
            self.published.lock().unwrap().clone()
        }
    }

    impl Default for MockWorkQueue {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl WorkQueue for MockWorkQueue {
        async fn publish(&self, topic: &str, payload: &str) -> Result<(), QueueError> {
            if *self.fail_publish.lock().unwrap() {
                return Err(QueueError::Send("mock publish failure".to_string()));
            }
            self.published
                .lock()
                .unwrap()
                .push((topic.to_string(), payload.to_string()));
            Ok(())
        }

        async fn subscribe(&self, _topic: &str) -> Result<Box<dyn QueueSubscription>, QueueError> {
            let rx = self
                .inject_rx
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| QueueError::Connect("subscription already taken".to_string()))?;
            Ok(Box::new(MockSubscription { rx }))
        }
    }

    struct MockSubscription {
        rx: mpsc::UnboundedReceiver<String>,
    }

    #[async_trait]
    impl QueueSubscription for MockSubscription {
        async fn next_message(&mut self) -> Result<Option<String>, QueueError> {
            match self.rx.recv().await {
                Some(payload) => Ok(Some(payload)),
                // Channel closed: behave like an idle broker, never resolve
                None => std::future::pending().await,
            }
        }
    }
}
