//! **Page scrapers**: `ChromeScraper` and `HttpScraper`
//!
//! | Scraper | JavaScript | Key Dependency |
//! |---------|-----------|----------------|
//! | [`ChromeScraper`] | yes (`--dump-dom` after a virtual time budget) | headless Chromium on `PATH` |
//! | [`HttpScraper`] | no | `reqwest` |
//!
//! [`select_scraper`] prefers a browser and falls back to plain HTTP when
//! allowed by configuration.

mod chrome;
mod http;

pub use chrome::{BROWSER_CANDIDATES, ChromeScraper, discover_browser};
pub use http::HttpScraper;

use quiz_application::ports::page_scraper::{PageScraper, ScrapeError};
use scraper::Html;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Scraper selection settings
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// Explicit browser binary; discovered on `PATH` when `None`
    pub binary: Option<PathBuf>,
    pub timeout: Duration,
    pub virtual_time_budget: Duration,
    /// Use [`HttpScraper`] when no browser is found
    pub fallback_to_http: bool,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            binary: None,
            timeout: Duration::from_secs(30),
            virtual_time_budget: Duration::from_secs(2),
            fallback_to_http: true,
        }
    }
}

/// Build the page scraper for these settings.
pub fn select_scraper(settings: &BrowserSettings) -> Result<Arc<dyn PageScraper>, ScrapeError> {
    let binary = settings.binary.clone().or_else(discover_browser);

    match binary {
        Some(binary) => {
            info!(browser = %binary.display(), "Using headless browser");
            Ok(Arc::new(
                ChromeScraper::new(binary)
                    .with_timeout(settings.timeout)
                    .with_virtual_time_budget(settings.virtual_time_budget),
            ))
        }
        None if settings.fallback_to_http => {
            warn!(
                "No headless browser found ({}), pages will be fetched without JavaScript",
                BROWSER_CANDIDATES.join(", ")
            );
            Ok(Arc::new(HttpScraper::new(settings.timeout)))
        }
        None => Err(ScrapeError::BrowserUnavailable(format!(
            "none of {} found on PATH",
            BROWSER_CANDIDATES.join(", ")
        ))),
    }
}

/// Only `http` and `https` pages are loaded
pub(crate) fn ensure_web_url(url: &str) -> Result<(), ScrapeError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ScrapeError::Navigation(format!("Invalid URL '{}': {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ScrapeError::Navigation(format!(
            "Unsupported URL scheme: {}",
            scheme
        ))),
    }
}

/// Elements whose text never reaches the reader
const HIDDEN_TAGS: &[&str] = &["head", "script", "style", "noscript", "svg", "template"];

/// Visible text of a page, whitespace collapsed to single spaces
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let words: Vec<&str> = document
        .root_element()
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|parent| {
                parent
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_TAGS.contains(&el.name()))
            })
        })
        .filter_map(|node| node.value().as_text())
        .flat_map(|text| text.split_whitespace())
        .collect();
    words.join(" ")
}
