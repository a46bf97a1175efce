//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Emit log lines as JSON
    pub json: bool,
    /// Directory for daily-rotated log files, in addition to stderr
    pub file_dir: Option<PathBuf>,
    /// JSONL file receiving one event per solver step
    pub run_log: Option<PathBuf>,
}
