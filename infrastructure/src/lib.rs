//! Infrastructure layer for quiz-solver
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod browser;
pub mod config;
pub mod executor;
pub mod gemini;
pub mod logging;
pub mod process;
pub mod submit;

// Re-export commonly used types
pub use browser::{BrowserSettings, ChromeScraper, HttpScraper, select_scraper};
pub use config::{ConfigIssue, ConfigLoader, FileConfig, Severity};
pub use executor::{PythonCodeRunner, discover_interpreter};
pub use gemini::{GeminiLlmGateway, GeminiSettings};
pub use logging::JsonlRunLogger;
pub use submit::HttpAnswerSubmitter;
