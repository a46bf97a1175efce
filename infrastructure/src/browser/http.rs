//! Plain HTTP page scraper (no JavaScript)
//!
//! Used when no headless browser is installed. Pages that build their
//! content client-side will come back mostly empty.

use super::{ensure_web_url, html_to_text};
use async_trait::async_trait;
use quiz_application::ports::page_scraper::{PageScraper, ScrapeError};
use quiz_domain::PageSnapshot;
use std::time::Duration;
use tracing::debug;

/// Maximum response body size (5 MB)
const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

const USER_AGENT: &str = concat!("quiz-solver/", env!("CARGO_PKG_VERSION"));

pub struct HttpScraper {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpScraper {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl PageScraper for HttpScraper {
    async fn scrape(&self, url: &str) -> Result<PageSnapshot, ScrapeError> {
        ensure_web_url(url)?;
        debug!(url, "Fetching page over HTTP");

        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScrapeError::Timeout(self.timeout.as_secs())
                } else {
                    ScrapeError::Navigation(format!("Failed to fetch URL: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Navigation(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        if response.content_length().unwrap_or(0) > MAX_BODY_SIZE as u64 {
            return Err(ScrapeError::Navigation(format!(
                "Response too large (max: {} bytes)",
                MAX_BODY_SIZE
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ScrapeError::Navigation(format!("Failed to read response body: {}", e)))?;
        if body.len() > MAX_BODY_SIZE {
            return Err(ScrapeError::Navigation(format!(
                "Response too large: {} bytes",
                body.len()
            )));
        }

        let html = String::from_utf8_lossy(&body).into_owned();
        if html.trim().is_empty() {
            return Err(ScrapeError::EmptyPage);
        }
        let text = html_to_text(&html);
        Ok(PageSnapshot::new(url, html, text))
    }
}
