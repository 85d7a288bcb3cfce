//! Error handling for the catalog CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Per-field details for rejected products
//! - Actionable suggestions
//! - Exit code mapping

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use catalog_adapters::AdapterError;
use catalog_core::application::ApplicationError;
use catalog_core::domain::{ValidationIssue, product_schema};
use catalog_core::error::{CatalogError, ErrorCategory as CoreCategory};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input that clap could not catch.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The gateway could not be built from the configured settings.
    #[error("{0}")]
    Adapter(#[from] AdapterError),

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `catalog-core`.
    #[error("{0}")]
    Core(#[from] CatalogError),

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Feature not available (e.g., prompts without the `interactive` feature).
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<ApplicationError> for CliError {
    fn from(err: ApplicationError) -> Self {
        CliError::Core(err.into())
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["Use --help for usage information".into()],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Check the file shown by 'catalog config path'".into(),
                "Use 'catalog init --force' to write a fresh default config".into(),
            ],

            Self::Adapter(AdapterError::InvalidBaseUrl { .. }) => vec![
                "The base URL must be an absolute http(s) URL without query or fragment".into(),
                "Example: --base-url http://localhost:8080/api/v1".into(),
            ],

            Self::Adapter(AdapterError::ClientBuild(_)) => {
                vec!["Run again with -vv for details".into()]
            }

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { .. } => vec![
                "Check that the file exists and is readable".into(),
                "Check file permissions".into(),
            ],

            Self::FeatureNotAvailable { feature } => vec![
                format!("The '{}' feature is not available in this build", feature),
                "Pass --yes to skip the confirmation prompt".into(),
            ],
        }
    }

    /// Lines describing what exactly was wrong, shown between the message
    /// and the suggestions.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::Core(CatalogError::Application(ApplicationError::InvalidProduct { issues })) => {
                issue_lines(issues)
            }
            Self::Core(CatalogError::Application(ApplicationError::Remote(err))) => {
                let (known, other) = err.known_field_errors(product_schema());
                known
                    .iter()
                    .chain(other.iter())
                    .map(|(field, message)| format!("{field}: {message}"))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Adapter(AdapterError::InvalidBaseUrl { .. }) => ErrorCategory::Configuration,
            Self::Adapter(AdapterError::ClientBuild(_)) => ErrorCategory::Internal,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Conflict => ErrorCategory::Conflict,
                CoreCategory::Network => ErrorCategory::Network,
                CoreCategory::Cancelled => ErrorCategory::Cancelled,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::FeatureNotAvailable { .. } => ErrorCategory::Configuration,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | Internal      |  1   |
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Conflict      |  5   |
    /// | Network       |  6   |
    /// | Cancelled     | 130  |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Internal => 1,
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Conflict => 5,
            ErrorCategory::Network => 6,
            ErrorCategory::Cancelled => 130,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        if self.category() == ErrorCategory::Cancelled {
            output.push_str(&format!("\n{} {}\n", "\u{2717}".yellow().bold(), "Cancelled".yellow()));
            return output;
        }

        // Error header
        output.push_str(&format!(
            "\n{} {}\n\n",
            "\u{2717}".red().bold(),
            "Error:".red().bold()
        ));

        // Main error message
        output.push_str(&format!("  {}\n", self.to_string().red()));

        for line in self.details() {
            output.push_str(&format!("    {} {}\n", "\u{2022}".red(), line));
        }

        // Error chain (if verbose)
        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "\u{2192}".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        // Suggestions
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        // Hint to re-run with -v
        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        if self.category() == ErrorCategory::Cancelled {
            return "\nCancelled\n".into();
        }

        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));

        for line in self.details() {
            out.push_str(&format!("  - {line}\n"));
        }

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Conflict => tracing::warn!("Conflict: {}", self),
            ErrorCategory::Cancelled => tracing::info!("Cancelled"),
            ErrorCategory::Network => tracing::error!("Network error: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// One line per issue, record-level issues last.
fn issue_lines(issues: &[ValidationIssue]) -> Vec<String> {
    let (fields, record): (Vec<_>, Vec<_>) = issues.iter().partition(|i| !i.is_record_level());
    fields
        .into_iter()
        .chain(record)
        .map(ToString::to_string)
        .collect()
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Resource already exists.
    Conflict,
    /// Backend unreachable or timed out.
    Network,
    /// Configuration error.
    Configuration,
    /// Interrupted by the user.
    Cancelled,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert I/O errors into [`CliError`] at call-sites
/// with a descriptive context message.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::application::{HttpFailure, normalize};
    use catalog_core::domain::{DomainError, IssueCode};
    use serde_json::json;
    use std::io;

    fn remote(failure: HttpFailure) -> CliError {
        ApplicationError::Remote(normalize(&failure)).into()
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn exit_code_user_error() {
        assert_eq!(
            CliError::InvalidInput {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            2
        );
        let invalid: CliError = ApplicationError::InvalidProduct { issues: vec![] }.into();
        assert_eq!(invalid.exit_code(), 2);
        let bad_query: CliError = CatalogError::from(DomainError::InvalidSort("x".into())).into();
        assert_eq!(bad_query.exit_code(), 2);
    }

    #[test]
    fn exit_codes_follow_normalized_type() {
        assert_eq!(remote(HttpFailure::response(404, None, "")).exit_code(), 3);
        assert_eq!(remote(HttpFailure::response(409, None, "")).exit_code(), 5);
        assert_eq!(remote(HttpFailure::transport("refused")).exit_code(), 6);
        assert_eq!(remote(HttpFailure::response(500, None, "")).exit_code(), 1);
        assert_eq!(remote(HttpFailure::response(422, None, "")).exit_code(), 2);
    }

    #[test]
    fn exit_code_configuration() {
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
        let url = CliError::Adapter(AdapterError::InvalidBaseUrl {
            url: "x".into(),
            reason: "y".into(),
        });
        assert_eq!(url.exit_code(), 4);
    }

    #[test]
    fn exit_code_cancelled() {
        let err: CliError = ApplicationError::Cancelled.into();
        assert_eq!(err.exit_code(), 130);
        assert!(!err.format_plain(false).contains("Error:"));
    }

    #[test]
    fn exit_code_internal() {
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
    }

    // ── details ───────────────────────────────────────────────────────────

    #[test]
    fn invalid_product_lists_each_issue() {
        let err: CliError = ApplicationError::InvalidProduct {
            issues: vec![
                ValidationIssue::record(IssueCode::InvalidType, "Expected an object"),
                ValidationIssue::new("price", IssueCode::TooSmall, "Price must be greater than zero"),
            ],
        }
        .into();
        assert_eq!(
            err.details(),
            ["price: Price must be greater than zero", "Expected an object"]
        );
    }

    #[test]
    fn remote_field_errors_show_known_fields_first() {
        let err = remote(HttpFailure::response(
            400,
            Some(json!({ "errors": [
                { "field": "sku", "message": "unknown" },
                { "field": "name", "message": "too short" }
            ] })),
            "Bad Request",
        ));
        assert_eq!(err.details(), ["name: too short", "sku: unknown"]);
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn format_plain_contains_error_header() {
        let err = remote(HttpFailure::response(404, None, "Not Found"));
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_omits_hint() {
        let err = CliError::FeatureNotAvailable {
            feature: "interactive",
        };
        let s = err.format_plain(true);
        assert!(!s.contains("--verbose"));
        assert!(s.contains("--yes"));
    }

    // ── IntoCli ───────────────────────────────────────────────────────────

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading product file");
        assert!(matches!(cli, Err(CliError::IoError { message, .. }) if message == "reading product file"));
    }
}
