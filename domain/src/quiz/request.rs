//! Incoming quiz task

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A quiz task posted by a client: who is answering, the shared secret, and
/// the first quiz page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRequest {
    pub email: String,
    pub secret: String,
    pub url: String,
}

impl QuizRequest {
    pub fn new(
        email: impl Into<String>,
        secret: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
            url: url.into(),
        }
    }

    /// Build a request from an arbitrary JSON body.
    ///
    /// Absent fields, non-string values and blank strings are all reported
    /// as [`DomainError::MissingFields`]. Extra keys are ignored.
    pub fn from_json(body: &Value) -> Result<Self, DomainError> {
        let field = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_default()
        };
        let request = Self::new(field("email"), field("secret"), field("url"));
        request.validate()?;
        Ok(request)
    }

    /// Every field must carry a non-blank value.
    pub fn validate(&self) -> Result<(), DomainError> {
        if [&self.email, &self.secret, &self.url]
            .iter()
            .any(|v| v.trim().is_empty())
        {
            return Err(DomainError::MissingFields);
        }
        Ok(())
    }
}
