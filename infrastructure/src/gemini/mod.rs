//! Gemini provider
//!
//! Talks to the Gemini REST API (`generativelanguage.googleapis.com`) with
//! `reqwest`. Authentication uses an API key sent in the `x-goog-api-key`
//! header.
//!
//! | Call | Endpoint |
//! |------|----------|
//! | generate | `POST /v1beta/models/{model}:generateContent` |
//! | list models | `GET /v1beta/models` |

mod gateway;
pub mod types;

pub use gateway::{DEFAULT_BASE_URL, GeminiLlmGateway, GeminiSettings};
