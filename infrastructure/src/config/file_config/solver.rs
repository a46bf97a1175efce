//! Solving loop configuration from TOML (`[solver]` section)

use quiz_application::SolverParams;
use quiz_domain::Model;
use quiz_domain::prompt::DEFAULT_PAGE_CHAR_LIMIT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSolverConfig {
    /// Quiz pages visited per run
    pub max_steps: usize,
    /// LLM attempts for page analysis
    pub analysis_attempts: usize,
    pub analysis_retry_delay_secs: u64,
    /// HTML bytes included in the analysis prompt
    pub page_char_limit: usize,
    /// Answer submission timeout in seconds
    pub submit_timeout_secs: u64,
}

impl Default for FileSolverConfig {
    fn default() -> Self {
        Self {
            max_steps: 10,
            analysis_attempts: 3,
            analysis_retry_delay_secs: 5,
            page_char_limit: DEFAULT_PAGE_CHAR_LIMIT,
            submit_timeout_secs: 15,
        }
    }
}

impl FileSolverConfig {
    pub fn to_solver_params(&self, model: Model) -> SolverParams {
        SolverParams::default()
            .with_model(model)
            .with_max_steps(self.max_steps)
            .with_analysis_attempts(self.analysis_attempts)
            .with_analysis_retry_delay(Duration::from_secs(self.analysis_retry_delay_secs))
            .with_page_char_limit(self.page_char_limit)
    }
}
