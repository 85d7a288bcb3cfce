//! Unified error handling for Catalog Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::{ApplicationError, ErrorType};
use crate::domain::DomainError;

/// Root error type for Catalog Core operations.
///
/// This enum wraps all possible errors that can occur when using catalog-core,
/// providing a unified interface for error handling.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    /// Errors from the domain layer (malformed ids, queries).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (validation, backend, cancellation).
    #[error("{0}")]
    Application(#[from] ApplicationError),
}

impl CatalogError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(_) => ErrorCategory::Validation,
            Self::Application(e) => e.category(),
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::Remote(err))
                if matches!(err.error_type, ErrorType::Client | ErrorType::ServerError)
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::Cancelled))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Network,
    Cancelled,
    Internal,
}

/// Convenient result type alias.
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{HttpFailure, normalize};

    #[test]
    fn categories_follow_normalized_type() {
        let not_found: CatalogError = ApplicationError::Remote(normalize(
            &HttpFailure::response(404, None, "Not Found"),
        ))
        .into();
        assert_eq!(not_found.category(), ErrorCategory::NotFound);
        assert!(!not_found.is_retryable());

        let offline: CatalogError =
            ApplicationError::Remote(normalize(&HttpFailure::transport("refused"))).into();
        assert_eq!(offline.category(), ErrorCategory::Network);
        assert!(offline.is_retryable());
    }

    #[test]
    fn domain_errors_are_validation() {
        let err: CatalogError = DomainError::InvalidSort("x".into()).into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn cancellation_is_its_own_category() {
        let err: CatalogError = ApplicationError::Cancelled.into();
        assert!(err.is_cancelled());
        assert_eq!(err.category(), ErrorCategory::Cancelled);
    }

    #[test]
    fn server_failures_are_internal_and_retryable() {
        let err: CatalogError = ApplicationError::Remote(normalize(&HttpFailure::response(
            500,
            None,
            "Internal Server Error",
        )))
        .into();
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(err.is_retryable());
        assert!(!err.is_cancelled());
    }
}
