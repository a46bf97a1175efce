//! Code runner port
//!
//! Executes LLM-generated code that defines a `get_answer()` entry point and
//! returns the value it produced.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while executing generated code
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Generated code did not define get_answer()")]
    MissingEntryPoint,

    #[error("Code execution failed: {0}")]
    Failed(String),

    #[error("Code execution timed out after {0} seconds")]
    Timeout(u64),

    #[error("Interpreter not available: {0}")]
    InterpreterUnavailable(String),

    #[error("Could not decode answer: {0}")]
    InvalidOutput(String),
}

#[async_trait]
pub trait CodeRunner: Send + Sync {
    /// Run `code` and return the JSON value of `get_answer()`
    async fn run(&self, code: &str) -> Result<Value, ExecutionError>;
}
