//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod answer_submitter;
pub mod code_runner;
pub mod llm_gateway;
pub mod page_scraper;
pub mod run_logger;
