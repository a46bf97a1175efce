//! Application-level configuration.
//!
//! - [`SolverParams`]: solving loop control (steps, retries, prompt budget)

pub mod solver_params;

pub use solver_params::SolverParams;
