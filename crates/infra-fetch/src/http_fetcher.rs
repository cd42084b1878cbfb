//! HTTP page fetcher.
//!
//! Fetches the document at a URL and extracts its title as the summary.

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use scrapeflow_core::application::constants::FETCH_TIMEOUT;
use scrapeflow_core::port::fetcher::{FetchError, PageFetcher, PageSummary};

/// Page fetcher backed by a plain HTTP client
pub struct HttpPageFetcher {
    client: reqwest::Client,
    title_re: Regex,
}

impl HttpPageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            // Title element, case-insensitive, content on one line or many
            title_re: Regex::new(r"(?is)<title[^>]*>(.*?)</title>")
                .expect("title pattern is valid"),
        }
    }

    fn extract_title(&self, body: &str) -> Option<String> {
        self.title_re
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|title| !title.is_empty())
    }
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<PageSummary, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let title = self.extract_title(&body);
        debug!(url = %url, title = ?title, "Page fetched");

        Ok(PageSummary {
            url: url.to_string(),
            title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let fetcher = HttpPageFetcher::new();
        let body = "<html><head><title>Example Domain</title></head></html>";
        assert_eq!(
            fetcher.extract_title(body),
            Some("Example Domain".to_string())
        );
    }

    #[test]
    fn test_extract_title_multiline_and_case() {
        let fetcher = HttpPageFetcher::new();
        let body = "<HTML><HEAD><TITLE>\n  Spread\n  Out\n</TITLE></HEAD>";
        assert_eq!(fetcher.extract_title(body), Some("Spread Out".to_string()));
    }

    #[test]
    fn test_extract_title_missing() {
        let fetcher = HttpPageFetcher::new();
        assert_eq!(fetcher.extract_title("<html><body>no title</body>"), None);
        assert_eq!(fetcher.extract_title("<title></title>"), None);
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let fetcher = HttpPageFetcher::new();
        // Reserved TLD, resolution must fail
        let result = fetcher.fetch("http://unreachable.invalid/").await;
        assert!(matches!(result, Err(FetchError::Request { .. })));
    }
}
