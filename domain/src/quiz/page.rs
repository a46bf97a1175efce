//! Rendered quiz page

use serde::{Deserialize, Serialize};

/// Snapshot of a page after rendering: the DOM serialized as HTML and its
/// visible text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    pub html: String,
    pub text: String,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, html: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            text: text.into(),
        }
    }
}
