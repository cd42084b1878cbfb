// Page fetch port
// Abstraction over the page-fetch/extraction engine

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Short textual result of fetching a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub url: String,
    /// Extracted page title, when the document carried one
    pub title: Option<String>,
}

/// Typed fetch failure carrying the URL and the underlying cause
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to fetch {url}: {reason}")]
    Request { url: String, reason: String },

    #[error("fetch of {url} returned status {status}")]
    BadStatus { url: String, status: u16 },
}

/// Page fetcher port
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page at `url` and extract a summary
    async fn fetch(&self, url: &str) -> Result<PageSummary, FetchError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock fetcher behavior
    #[derive(Debug, Clone)]
    pub enum MockFetchBehavior {
        /// Succeed with the given title
        Success(String),
        /// Fail with a request error
        Fail(String),
    }

    /// Mock PageFetcher for testing
    pub struct MockPageFetcher {
        behavior: Arc<Mutex<MockFetchBehavior>>,
        fetched: Arc<Mutex<Vec<String>>>,
    }

    impl MockPageFetcher {
        pub fn new(behavior: MockFetchBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                fetched: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success(title: impl Into<String>) -> Self {
            Self::new(MockFetchBehavior::Success(title.into()))
        }

        pub fn new_fail(reason: impl Into<String>) -> Self {
            Self::new(MockFetchBehavior::Fail(reason.into()))
        }

        pub fn set_behavior(&self, behavior: MockFetchBehavior) {
            *self.behavior.lock().unwrap() = behavior;
        }

        /// URLs this mock was asked to fetch, in order
        pub fn fetched(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for MockPageFetcher {
        async fn fetch(&self, url: &str) -> Result<PageSummary, FetchError> {
            self.fetched.lock().unwrap().push(url.to_string());

            let behavior = self.behavior.lock().unwrap().clone();
            match behavior {
                MockFetchBehavior::Success(title) => Ok(PageSummary {
                    url: url.to_string(),
                    title: Some(title),
                }),
                MockFetchBehavior::Fail(reason) => Err(FetchError::Request {
                    url: url.to_string(),
                    reason,
                }),
            }
        }
    }
}
