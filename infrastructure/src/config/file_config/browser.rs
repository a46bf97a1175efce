//! Page scraping configuration from TOML (`[browser]` section)

use crate::browser::BrowserSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBrowserConfig {
    /// Browser binary; discovered on `PATH` when unset
    pub binary: Option<PathBuf>,
    pub timeout_secs: u64,
    /// Time page scripts get before the DOM is captured
    pub virtual_time_budget_ms: u64,
    /// Fetch pages without JavaScript when no browser is installed
    pub fallback_to_http: bool,
}

impl Default for FileBrowserConfig {
    fn default() -> Self {
        Self {
            binary: None,
            timeout_secs: 30,
            virtual_time_budget_ms: 2000,
            fallback_to_http: true,
        }
    }
}

impl FileBrowserConfig {
    pub fn to_browser_settings(&self) -> BrowserSettings {
        BrowserSettings {
            binary: self.binary.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            virtual_time_budget: Duration::from_millis(self.virtual_time_budget_ms),
            fallback_to_http: self.fallback_to_http,
        }
    }
}
