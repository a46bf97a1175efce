//! Configuration file loading for quiz-solver
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `QUIZ_SOLVER_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./quiz-solver.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/quiz-solver/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileBrowserConfig, FileConfig, FileExecutorConfig, FileLlmConfig,
    FileLoggingConfig, FileServerConfig, FileSolverConfig, Severity,
};
pub use loader::{ConfigLoader, ENV_PREFIX, PROJECT_CONFIG_FILE};
