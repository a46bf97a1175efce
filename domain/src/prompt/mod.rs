//! Prompt domain
//!
//! Templates for the two LLM calls of a solving step.

mod template;

pub use template::{DEFAULT_PAGE_CHAR_LIMIT, PromptTemplate};
