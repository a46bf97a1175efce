//! Solver parameters: use case loop control.
//!
//! [`SolverParams`] groups the static parameters that control the solving
//! loop in [`SolveQuizUseCase`](crate::use_cases::solve_quiz::SolveQuizUseCase).

use quiz_domain::Model;
use quiz_domain::prompt::DEFAULT_PAGE_CHAR_LIMIT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Solving loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverParams {
    /// Model used for both page analysis and code generation.
    pub model: Model,
    /// Maximum number of quiz pages visited in one run.
    pub max_steps: usize,
    /// LLM attempts for page analysis before giving up.
    pub analysis_attempts: usize,
    /// Pause between failed analysis attempts.
    pub analysis_retry_delay: Duration,
    /// HTML bytes included in the analysis prompt.
    pub page_char_limit: usize,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            model: Model::default(),
            max_steps: 10,
            analysis_attempts: 3,
            analysis_retry_delay: Duration::from_secs(5),
            page_char_limit: DEFAULT_PAGE_CHAR_LIMIT,
        }
    }
}

impl SolverParams {
    // ==================== Builder Methods ====================

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_analysis_attempts(mut self, attempts: usize) -> Self {
        self.analysis_attempts = attempts;
        self
    }

    pub fn with_analysis_retry_delay(mut self, delay: Duration) -> Self {
        self.analysis_retry_delay = delay;
        self
    }

    pub fn with_page_char_limit(mut self, limit: usize) -> Self {
        self.page_char_limit = limit;
        self
    }
}
