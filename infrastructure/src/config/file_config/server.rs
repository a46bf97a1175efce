//! Server configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Bind address
    pub host: String,
    pub port: u16,
    /// Background runs executing at the same time; further runs queue
    pub max_concurrent_runs: usize,
    /// Run reports kept in memory for `GET /runs/{id}`
    pub run_history: usize,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_concurrent_runs: 4,
            run_history: 256,
        }
    }
}
