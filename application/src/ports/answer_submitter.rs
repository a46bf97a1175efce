//! Answer submitter port

use async_trait::async_trait;
use quiz_domain::{Submission, SubmitOutcome};
use thiserror::Error;

/// Errors that can occur while posting an answer
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Submission request failed: {0}")]
    Transport(String),

    #[error("Submission response is not valid JSON: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait AnswerSubmitter: Send + Sync {
    /// Post `submission` to `submit_url` and decode the verdict
    async fn submit(
        &self,
        submit_url: &str,
        submission: &Submission,
    ) -> Result<SubmitOutcome, SubmitError>;
}
