//! Run subdomain
//!
//! A run is the background execution started by one quiz request. It keeps
//! one [`StepRecord`] per visited page and ends in a terminal [`RunStatus`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stage of a step where a run can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    Scrape,
    Analyze,
    Generate,
    Submit,
}

impl RunStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStage::Scrape => "scrape",
            RunStage::Analyze => "analyze",
            RunStage::Generate => "generate",
            RunStage::Submit => "submit",
        }
    }
}

impl std::fmt::Display for RunStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    /// The server accepted the last answer and sent no further page.
    Completed,
    /// The server rejected an answer.
    Incorrect,
    /// Still correct after the last allowed step.
    StepLimitReached,
    Failed { stage: RunStage, reason: String },
    Cancelled,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Running)
    }

    pub fn failed(stage: RunStage, reason: impl Into<String>) -> Self {
        RunStatus::Failed {
            stage,
            reason: reason.into(),
        }
    }
}

/// One scrape → analyze → execute → submit cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based step number
    pub step: usize,
    pub page_url: String,
    pub submit_url: Option<String>,
    pub question: Option<String>,
    pub answer: Option<Value>,
    pub correct: Option<bool>,
    pub next_url: Option<String>,
}

impl StepRecord {
    pub fn new(step: usize, page_url: impl Into<String>) -> Self {
        Self {
            step,
            page_url: page_url.into(),
            submit_url: None,
            question: None,
            answer: None,
            correct: None,
            next_url: None,
        }
    }
}

/// Summary of a run, served by the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRunReport {
    pub run_id: String,
    pub start_url: String,
    pub steps: Vec<StepRecord>,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl QuizRunReport {
    pub fn new(run_id: impl Into<String>, start_url: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            start_url: start_url.into(),
            steps: Vec::new(),
            status: RunStatus::Running,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn push_step(&mut self, step: StepRecord) {
        self.steps.push(step);
    }

    /// Set the terminal status and stamp the finish time.
    pub fn finish(&mut self, status: RunStatus) {
        self.status = status;
        self.finished_at = Some(Utc::now());
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }
}
