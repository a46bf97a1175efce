//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.

use async_trait::async_trait;
use quiz_domain::Model;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Other error: {0}")]
    Other(String),
}

/// Shape of the text the model is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    /// Ask the provider to constrain output to JSON
    Json,
}

/// A single-turn generation request
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: Model,
    pub prompt: String,
    pub response_format: ResponseFormat,
}

impl GenerateRequest {
    pub fn new(model: Model, prompt: impl Into<String>) -> Self {
        Self {
            model,
            prompt: prompt.into(),
            response_format: ResponseFormat::Text,
        }
    }

    pub fn json(mut self) -> Self {
        self.response_format = ResponseFormat::Json;
        self
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a prompt and return the generated text
    async fn generate(&self, request: &GenerateRequest) -> Result<String, GatewayError>;

    /// Names of the models the provider exposes
    async fn available_models(&self) -> Result<Vec<String>, GatewayError>;
}
