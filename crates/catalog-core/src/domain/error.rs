// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Record validation never produces a `DomainError`: a failed form is a
/// [`ValidationResult::Invalid`](crate::domain::ValidationResult), not an
/// error. These variants cover malformed identifiers and query input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Input Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid product id '{0}': expected a UUID")]
    InvalidProductId(String),

    #[error("Invalid sort order '{0}': expected 'property,asc' or 'property,desc'")]
    InvalidSort(String),

    #[error("Invalid query parameter '{field}': {reason}")]
    InvalidQuery { field: &'static str, reason: String },

    #[error("Invalid {field} range: minimum {min} is greater than maximum {max}")]
    InvalidRange {
        field: &'static str,
        min: String,
        max: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidProductId(id) => vec![
                format!("'{}' is not a product id", id),
                "Product ids are UUIDs, e.g. 3f2c8a1e-5b7d-4c1a-9e0f-2a6b8c4d1e3f".into(),
                "Try: catalog list to see existing ids".into(),
            ],
            Self::InvalidSort(_) => vec![
                "Sort orders look like 'name,asc' or 'price,desc'".into(),
                "Pass --sort more than once to sort by several properties".into(),
            ],
            Self::InvalidQuery { field, reason } => vec![
                format!("Check the '{}' filter: {}", field, reason),
            ],
            Self::InvalidRange { field, .. } => vec![
                format!("The minimum {} must not exceed the maximum", field),
                "Swap the two bounds or drop one of them".into(),
            ],
        }
    }
}
