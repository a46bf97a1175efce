//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: the LLM model used to analyze pages and write code
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
