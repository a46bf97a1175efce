//! Prompt templates for a solving step

use crate::util::truncate_str;

/// Default number of HTML bytes sent to the model for page analysis
pub const DEFAULT_PAGE_CHAR_LIMIT: usize = 20_000;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Prompt asking the model to find the submit URL and the task on a page.
    ///
    /// The page HTML is cut to `page_char_limit` bytes.
    pub fn analysis(page_html: &str, page_char_limit: usize) -> String {
        format!(
            r#"You are an autonomous bot. Analyze this HTML page:

{}

Extract:
1. The exact submission URL (often mentioned near "Post your answer to...").
2. The precise question or task to solve.

Return ONLY valid JSON: {{ "submit_url": "...", "question": "..." }}"#,
            truncate_str(page_html, page_char_limit)
        )
    }

    /// Prompt asking the model for Python code that computes the answer.
    pub fn solve_code(question: &str) -> String {
        format!(
            r#"Write Python code to solve this: "{}".

Context:
- If needing files, download using `requests`.
- If parsing PDF, use `PyPDF2`.
- If analyzing data, use `pandas`.
- Define a function `get_answer()` that returns the answer.
- Return the answer exactly as requested (int, string, bool).

Return ONLY Python code."#,
            question
        )
    }
}
