//! Generated code execution configuration from TOML (`[executor]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    /// Python interpreter; discovered on `PATH` when unset
    pub interpreter: Option<PathBuf>,
    pub timeout_secs: u64,
    /// Working directory for generated code (process cwd when unset)
    pub working_dir: Option<PathBuf>,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        Self {
            interpreter: None,
            timeout_secs: 60,
            working_dir: None,
        }
    }
}
