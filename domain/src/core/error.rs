//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Missing fields")]
    MissingFields,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_display() {
        assert_eq!(DomainError::MissingFields.to_string(), "Missing fields");
    }

    #[test]
    fn test_invalid_url_display() {
        assert_eq!(
            DomainError::InvalidUrl("nowhere".to_string()).to_string(),
            "Invalid URL: nowhere"
        );
    }
}
