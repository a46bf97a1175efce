//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod run_registry;
pub mod solve_quiz;
