//! Headless Chromium page scraper
//!
//! Renders the page with `--dump-dom`, which prints the DOM after scripts
//! ran for the virtual time budget.

use super::{ensure_web_url, html_to_text};
use crate::process::{bind_to_parent, last_stderr_line};
use async_trait::async_trait;
use quiz_application::ports::page_scraper::{PageScraper, ScrapeError};
use quiz_domain::PageSnapshot;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Binary names searched on `PATH`, in order
pub const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

/// Find a Chromium-family browser on `PATH`
pub fn discover_browser() -> Option<PathBuf> {
    BROWSER_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
}

pub struct ChromeScraper {
    binary: PathBuf,
    timeout: Duration,
    virtual_time_budget: Duration,
}

impl ChromeScraper {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: Duration::from_secs(30),
            virtual_time_budget: Duration::from_secs(2),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Virtual time granted to page scripts before the DOM is dumped
    pub fn with_virtual_time_budget(mut self, budget: Duration) -> Self {
        self.virtual_time_budget = budget;
        self
    }

    fn command(&self, url: &str) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args([
            "--headless=new",
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--hide-scrollbars",
            "--mute-audio",
        ])
        .arg(format!(
            "--virtual-time-budget={}",
            self.virtual_time_budget.as_millis()
        ))
        .arg("--dump-dom")
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
        bind_to_parent(&mut cmd);
        cmd
    }
}

#[async_trait]
impl PageScraper for ChromeScraper {
    async fn scrape(&self, url: &str) -> Result<PageSnapshot, ScrapeError> {
        ensure_web_url(url)?;

        debug!(browser = %self.binary.display(), url, "Rendering page");
        let child = self.command(url).spawn().map_err(|e| {
            ScrapeError::BrowserUnavailable(format!("{}: {}", self.binary.display(), e))
        })?;

        // Dropping the future on timeout drops the child, which kills it
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ScrapeError::Timeout(self.timeout.as_secs()))??;

        if !output.status.success() {
            return Err(ScrapeError::Navigation(format!(
                "browser exited with {}: {}",
                output.status,
                last_stderr_line(&output.stderr)
            )));
        }

        let html = String::from_utf8_lossy(&output.stdout).into_owned();
        if html.trim().is_empty() {
            return Err(ScrapeError::EmptyPage);
        }

        let text = html_to_text(&html);
        Ok(PageSnapshot::new(url, html, text))
    }
}
