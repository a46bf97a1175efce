//! Application layer for quiz-solver
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::SolverParams;
pub use ports::{
    answer_submitter::{AnswerSubmitter, SubmitError},
    code_runner::{CodeRunner, ExecutionError},
    llm_gateway::{GatewayError, GenerateRequest, LlmGateway, ResponseFormat},
    page_scraper::{PageScraper, ScrapeError},
    run_logger::{NoRunLogger, RunEvent, RunLogger},
};
pub use use_cases::run_registry::RunRegistry;
pub use use_cases::solve_quiz::SolveQuizUseCase;
