//! Application layer errors.
//!
//! These errors represent failures in orchestration: a submission blocked
//! by local validation, a backend failure, or a cancelled request.
//! Malformed ids and queries are `DomainError` from `crate::domain`.

use thiserror::Error;

use crate::application::normalizer::{ErrorType, NormalizedError};
use crate::domain::ValidationIssue;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Local validation blocked the submission; nothing was sent.
    #[error("Product is invalid ({} issue(s))", issues.len())]
    InvalidProduct { issues: Vec<ValidationIssue> },

    /// The backend rejected or failed the request.
    #[error("{0}")]
    Remote(NormalizedError),

    /// The request was abandoned before a response arrived.
    #[error("Request cancelled")]
    Cancelled,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidProduct { .. } => vec![
                "Fix the fields listed above and submit again".into(),
                "Try: catalog validate to check input without contacting the server".into(),
            ],
            Self::Remote(err) => match err.error_type {
                ErrorType::Client => vec![
                    "Check that the backend is running and reachable".into(),
                    "Override the address with --base-url or CATALOG_API__BASE_URL".into(),
                ],
                ErrorType::NotFound => vec!["Try: catalog list to see existing products".into()],
                ErrorType::Conflict => vec![
                    "A product with these details already exists".into(),
                    "Choose a different name or update the existing product".into(),
                ],
                ErrorType::ServerError => vec![
                    "The server failed to handle the request".into(),
                    "Try again in a moment".into(),
                ],
                t if t.is_input_error() => vec!["Correct the input and try again".into()],
                _ => vec!["Run again with -vv for request details".into()],
            },
            Self::Cancelled => vec![],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProduct { .. } => ErrorCategory::Validation,
            Self::Remote(err) => match err.error_type {
                ErrorType::Client => ErrorCategory::Network,
                ErrorType::NotFound => ErrorCategory::NotFound,
                ErrorType::Conflict => ErrorCategory::Conflict,
                t if t.is_input_error() => ErrorCategory::Validation,
                _ => ErrorCategory::Internal,
            },
            Self::Cancelled => ErrorCategory::Cancelled,
        }
    }
}

impl From<NormalizedError> for ApplicationError {
    fn from(err: NormalizedError) -> Self {
        Self::Remote(err)
    }
}
