//! Answer submission and the quiz server's verdict

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body posted to the submission endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub email: String,
    pub secret: String,
    /// The quiz page that was solved (not the submit endpoint).
    pub url: String,
    /// Whatever `get_answer()` returned, `null` when execution failed.
    pub answer: Value,
}

/// Verdict returned by the quiz server.
///
/// Decoded leniently: unknown keys are ignored and every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub correct: Option<bool>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reason: Option<String>,
}

impl SubmitOutcome {
    /// Only a literal JSON `true` counts as correct.
    pub fn is_correct(&self) -> bool {
        self.correct == Some(true)
    }

    /// Next quiz page, if the server sent a non-empty one.
    pub fn next_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?
        .as_str()
        .map(str::to_string))
}

/// Turn the submit URL found on a page into an absolute one.
///
/// - `http...` is used as is
/// - `/path` is appended to the origin of `current_url`
/// - anything else is appended to `current_url` after a `/`
pub fn resolve_submit_url(current_url: &str, submit_url: &str) -> Result<String, DomainError> {
    if submit_url.starts_with("http") {
        return Ok(submit_url.to_string());
    }

    let parts: Vec<&str> = current_url.split('/').collect();
    if parts.len() < 3 {
        return Err(DomainError::InvalidUrl(current_url.to_string()));
    }

    if submit_url.starts_with('/') {
        let origin = format!("{}//{}", parts[0], parts[2]);
        Ok(format!("{}{}", origin, submit_url))
    } else {
        Ok(format!("{}/{}", current_url, submit_url))
    }
}
