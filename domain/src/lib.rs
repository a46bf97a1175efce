//! Domain layer for quiz-solver
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Quiz run
//!
//! A run starts from a [`QuizRequest`] and walks a chain of quiz pages:
//!
//! - **Step**: scrape the page, extract the task ([`TaskAnalysis`]), generate
//!   and execute code, then post a [`Submission`]
//! - **Outcome**: the quiz server answers with a [`SubmitOutcome`] that may
//!   point at the next page
//!
//! The whole run is summarized by a [`QuizRunReport`].

pub mod core;
pub mod prompt;
pub mod quiz;
pub mod run;
pub mod util;

// Re-export commonly used types
pub use core::{error::DomainError, model::Model};
pub use prompt::PromptTemplate;
pub use quiz::{
    analysis::{TaskAnalysis, parse_json_response, strip_code_fence},
    page::PageSnapshot,
    request::QuizRequest,
    submission::{Submission, SubmitOutcome, resolve_submit_url},
};
pub use run::{QuizRunReport, RunStage, RunStatus, StepRecord};
