//! HTTP adapter for the [`AnswerSubmitter`] port

use async_trait::async_trait;
use quiz_application::ports::answer_submitter::{AnswerSubmitter, SubmitError};
use quiz_domain::{Submission, SubmitOutcome};
use std::time::Duration;
use tracing::debug;

/// Default timeout for answer submission
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);

pub struct HttpAnswerSubmitter {
    client: reqwest::Client,
    timeout: Duration,
}

impl Default for HttpAnswerSubmitter {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_TIMEOUT)
    }
}

impl HttpAnswerSubmitter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl AnswerSubmitter for HttpAnswerSubmitter {
    async fn submit(
        &self,
        submit_url: &str,
        submission: &Submission,
    ) -> Result<SubmitOutcome, SubmitError> {
        let response = self
            .client
            .post(submit_url)
            .json(submission)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        debug!(status = status.as_u16(), body = %body, "Submission response");

        // The verdict is read regardless of status: quiz servers answer
        // wrong submissions with 4xx and a JSON body.
        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            SubmitError::InvalidResponse(format!("HTTP {}: {}", status.as_u16(), e))
        })?;
        serde_json::from_value(value).map_err(|e| SubmitError::InvalidResponse(e.to_string()))
    }
}
