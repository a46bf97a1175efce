//! Gemini REST adapter for the [`LlmGateway`] port

use super::types::{
    ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, ListModelsResponse,
};
use async_trait::async_trait;
use quiz_application::ports::llm_gateway::{
    GatewayError, GenerateRequest, LlmGateway, ResponseFormat,
};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Default Gemini API endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Connection settings for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct GeminiLlmGateway {
    client: reqwest::Client,
    settings: GeminiSettings,
}

impl GeminiLlmGateway {
    pub fn new(settings: GeminiSettings) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/v1beta/{}",
            self.settings.base_url.trim_end_matches('/'),
            path
        )
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|env| match env.error.status {
                Some(code) => format!("{}: {}", code, env.error.message),
                None => env.error.message,
            })
            .unwrap_or(body);

        Err(if status == StatusCode::TOO_MANY_REQUESTS {
            GatewayError::RateLimited(message)
        } else {
            GatewayError::RequestFailed(format!("HTTP {}: {}", status.as_u16(), message))
        })
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_connect() || e.is_timeout() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl LlmGateway for GeminiLlmGateway {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, GatewayError> {
        let mime = match request.response_format {
            ResponseFormat::Json => Some("application/json"),
            ResponseFormat::Text => None,
        };
        let body = GenerateContentRequest::user_prompt(&request.prompt, mime);
        let url = self.endpoint(&format!("models/{}:generateContent", request.model));

        debug!(
            model = %request.model,
            prompt_bytes = request.prompt.len(),
            json = mime.is_some(),
            "Calling Gemini generateContent"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check_status(response).await?;

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("Invalid response body: {}", e)))?;

        debug!(finish_reason = ?parsed.finish_reason(), "Gemini response received");
        parsed.text().ok_or(GatewayError::EmptyResponse)
    }

    async fn available_models(&self) -> Result<Vec<String>, GatewayError> {
        let response = self
            .client
            .get(self.endpoint("models"))
            .header("x-goog-api-key", &self.settings.api_key)
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check_status(response).await?;

        let parsed: ListModelsResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("Invalid response body: {}", e)))?;

        Ok(parsed
            .models
            .into_iter()
            .map(|m| {
                m.name
                    .strip_prefix("models/")
                    .map(str::to_string)
                    .unwrap_or(m.name)
            })
            .collect())
    }
}
