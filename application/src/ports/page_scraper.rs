//! Page scraper port
//!
//! Renders a quiz page (JavaScript included where the adapter supports it)
//! and returns its DOM.

use async_trait::async_trait;
use quiz_domain::PageSnapshot;
use thiserror::Error;

/// Errors that can occur while rendering a page
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("No browser available: {0}")]
    BrowserUnavailable(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Page load timed out after {0} seconds")]
    Timeout(u64),

    #[error("Page rendered no content")]
    EmptyPage,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Load `url` and return the rendered page
    async fn scrape(&self, url: &str) -> Result<PageSnapshot, ScrapeError>;
}
