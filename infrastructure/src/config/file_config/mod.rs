//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Conversion into runtime settings happens through the `to_*` methods of
//! each section.

mod browser;
mod executor;
mod llm;
mod logging;
mod server;
mod solver;

pub use browser::FileBrowserConfig;
pub use executor::FileExecutorConfig;
pub use llm::FileLlmConfig;
pub use logging::FileLoggingConfig;
pub use server::FileServerConfig;
pub use solver::FileSolverConfig;

use serde::{Deserialize, Serialize};

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the server cannot start with this configuration.
    Error,
    /// Non-fatal: the server starts but may not behave as expected.
    Warning,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted key the issue is about, e.g. `solver.max_steps`
    pub field: &'static str,
    pub message: String,
}

impl ConfigIssue {
    fn error(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field,
            message: message.into(),
        }
    }

    fn warning(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP server settings
    pub server: FileServerConfig,
    /// Gemini API settings
    pub llm: FileLlmConfig,
    /// Solving loop settings
    pub solver: FileSolverConfig,
    /// Page scraping settings
    pub browser: FileBrowserConfig,
    /// Generated code execution settings
    pub executor: FileExecutorConfig,
    /// Log output settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.llm.resolve_api_key().is_none() {
            issues.push(ConfigIssue::warning(
                "llm.api_key",
                format!(
                    "No API key: set llm.api_key or the {} environment variable; every run will fail",
                    self.llm.api_key_env
                ),
            ));
        }
        if self.llm.model.trim().is_empty() {
            issues.push(ConfigIssue::error("llm.model", "llm.model must not be empty"));
        }
        if self.llm.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                "llm.timeout_secs",
                "llm.timeout_secs must be greater than 0",
            ));
        }

        if self.server.max_concurrent_runs == 0 {
            issues.push(ConfigIssue::error(
                "server.max_concurrent_runs",
                "server.max_concurrent_runs must be at least 1",
            ));
        }
        if self.server.run_history == 0 {
            issues.push(ConfigIssue::warning(
                "server.run_history",
                "server.run_history is 0; run reports will not be retrievable",
            ));
        }

        if self.solver.max_steps == 0 {
            issues.push(ConfigIssue::error(
                "solver.max_steps",
                "solver.max_steps must be at least 1",
            ));
        }
        if self.solver.analysis_attempts == 0 {
            issues.push(ConfigIssue::error(
                "solver.analysis_attempts",
                "solver.analysis_attempts must be at least 1",
            ));
        }
        if self.solver.submit_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                "solver.submit_timeout_secs",
                "solver.submit_timeout_secs must be greater than 0",
            ));
        }

        if self.browser.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                "browser.timeout_secs",
                "browser.timeout_secs must be greater than 0",
            ));
        }
        if let Some(binary) = &self.browser.binary {
            if !binary.exists() {
                issues.push(ConfigIssue::warning(
                    "browser.binary",
                    format!("browser.binary {} does not exist", binary.display()),
                ));
            }
        }

        if self.executor.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                "executor.timeout_secs",
                "executor.timeout_secs must be greater than 0",
            ));
        }
        if let Some(dir) = &self.executor.working_dir {
            if !dir.is_dir() {
                issues.push(ConfigIssue::warning(
                    "executor.working_dir",
                    format!("executor.working_dir {} is not a directory", dir.display()),
                ));
            }
        }

        issues
    }
}
