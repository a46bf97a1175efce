//! Parsing of LLM output
//!
//! Models often wrap JSON and code in markdown fences, and sometimes answer
//! with a one-element array instead of an object. The helpers here normalize
//! both before the solver looks at the content.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Task extracted from a quiz page by the LLM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAnalysis {
    /// Where the answer must be posted (absolute or relative).
    pub submit_url: String,
    /// The question to solve, when the model found one.
    pub question: Option<String>,
}

impl TaskAnalysis {
    /// Parse the analysis response of the LLM.
    ///
    /// Returns `None` when the text is not JSON, is not an object, or has no
    /// non-empty `submit_url`. Surrounding whitespace in `submit_url` is
    /// removed, so a blank URL counts as missing.
    pub fn from_llm_text(text: &str) -> Option<Self> {
        let value = parse_json_response(text)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        let submit_url = value.get("submit_url")?.as_str()?.trim();
        if submit_url.is_empty() {
            return None;
        }
        let question = value
            .get("question")
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self {
            submit_url: submit_url.to_string(),
            question,
        })
    }

    /// Question text for prompts; an absent question becomes `"None"`.
    pub fn question_or_none(&self) -> &str {
        self.question.as_deref().unwrap_or("None")
    }
}

/// Remove a surrounding markdown fence (```` ```lang ... ``` ````).
///
/// When the trimmed text starts with a fence, its first and last lines are
/// dropped. Anything else is returned trimmed.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let lines: Vec<&str> = trimmed.split('\n').collect();
    if lines.len() <= 2 {
        return String::new();
    }
    lines[1..lines.len() - 1].join("\n")
}

/// Parse a JSON answer from the model.
///
/// A JSON array yields its first element (an empty array yields an empty
/// object). Returns `None` when the text is not valid JSON.
pub fn parse_json_response(text: &str) -> Option<Value> {
    let clean = strip_code_fence(text);
    match serde_json::from_str::<Value>(&clean) {
        Ok(Value::Array(items)) => Some(
            items
                .into_iter()
                .next()
                .unwrap_or_else(|| Value::Object(Default::default())),
        ),
        Ok(value) => Some(value),
        Err(_) => None,
    }
}
