//! Quiz subdomain
//!
//! Everything a single solving step touches: the incoming request, the
//! rendered page, the task extracted by the LLM and the answer submission.

pub mod analysis;
pub mod page;
pub mod request;
pub mod submission;
