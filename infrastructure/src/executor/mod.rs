//! Execution of LLM-generated code
//!
//! Generated code runs in a separate interpreter process with a timeout; it
//! is never evaluated inside the server.

mod python;

pub use python::{INTERPRETER_CANDIDATES, PythonCodeRunner, discover_interpreter};
