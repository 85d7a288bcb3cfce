//! Validation outcomes: issues, issue codes, and the result type.
//!
//! The engine itself lives in [`schema`](crate::domain::schema); this module
//! only defines what it produces.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key used for record-level issues when grouping by field.
pub const ROOT_KEY: &str = "root";

// ── IssueCode ────────────────────────────────────────────────────────────────

/// Machine-readable classification of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    TooSmall,
    TooBig,
    InvalidType,
    NotMultipleOf,
    NotInteger,
    Required,
    Custom,
}

impl IssueCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TooSmall => "too_small",
            Self::TooBig => "too_big",
            Self::InvalidType => "invalid_type",
            Self::NotMultipleOf => "not_multiple_of",
            Self::NotInteger => "not_integer",
            Self::Required => "required",
            Self::Custom => "custom",
        }
    }

    /// Generic message for this code, for callers that only hold a code.
    ///
    /// Schema-produced issues always carry their own, more specific message.
    pub fn default_message(&self, context: &IssueContext) -> String {
        match self {
            Self::TooSmall => context
                .minimum
                .map_or_else(|| "Value is too small".into(), |min| {
                    format!("Value must be at least {min}")
                }),
            Self::TooBig => context
                .maximum
                .map_or_else(|| "Value is too large".into(), |max| {
                    format!("Value cannot exceed {max}")
                }),
            Self::InvalidType => "Invalid data type provided".into(),
            Self::NotMultipleOf => context
                .multiple_of
                .map_or_else(|| "Invalid decimal precision".into(), |step| {
                    format!("Value must be a multiple of {step}")
                }),
            Self::NotInteger => "Value must be a whole number".into(),
            Self::Required => "This field is required".into(),
            Self::Custom => context
                .rule
                .as_ref()
                .map_or_else(|| "Business rule violation".into(), |rule| {
                    format!("Business rule violation: {rule}")
                }),
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ValidationIssue ──────────────────────────────────────────────────────────

/// Bounds and values that explain an issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<Value>,
    /// Name of the business rule that produced a `custom` issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Dot-separated field path; empty for record-level issues.
    pub path: String,
    pub code: IssueCode,
    pub message: String,
    #[serde(default)]
    pub context: IssueContext,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code,
            message: message.into(),
            context: IssueContext::default(),
        }
    }

    /// Issue that applies to the whole record rather than one field.
    pub fn record(code: IssueCode, message: impl Into<String>) -> Self {
        Self::new(String::new(), code, message)
    }

    pub fn with_context(mut self, context: IssueContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_received(mut self, received: &Value) -> Self {
        self.context.received = Some(received.clone());
        self
    }

    /// Top-level field this issue belongs to, `None` for record-level issues.
    pub fn field(&self) -> Option<&str> {
        self.path.split('.').next().filter(|head| !head.is_empty())
    }

    pub fn is_record_level(&self) -> bool {
        self.path.is_empty()
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Group issues by top-level field, preserving order within each group.
///
/// Record-level issues are grouped under [`ROOT_KEY`].
pub fn issues_by_field(issues: &[ValidationIssue]) -> BTreeMap<&str, Vec<&ValidationIssue>> {
    let mut grouped: BTreeMap<&str, Vec<&ValidationIssue>> = BTreeMap::new();
    for issue in issues {
        grouped
            .entry(issue.field().unwrap_or(ROOT_KEY))
            .or_default()
            .push(issue);
    }
    grouped
}

// ── ValidationResult ─────────────────────────────────────────────────────────

/// Outcome of validating a field or a record.
///
/// `Invalid` always holds at least one issue; use [`ValidationResult::from_parts`]
/// rather than building the variant by hand.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult<T> {
    Valid(T),
    Invalid(Vec<ValidationIssue>),
}

impl<T> ValidationResult<T> {
    /// `Valid(value)` when `issues` is empty, `Invalid(issues)` otherwise.
    pub fn from_parts(value: T, issues: Vec<ValidationIssue>) -> Self {
        if issues.is_empty() {
            Self::Valid(value)
        } else {
            Self::Invalid(issues)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Issues in evaluation order; empty when valid.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Valid(_) => &[],
            Self::Invalid(issues) => issues,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, Vec<ValidationIssue>> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(issues) => Err(issues),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationResult<U> {
        match self {
            Self::Valid(value) => ValidationResult::Valid(f(value)),
            Self::Invalid(issues) => ValidationResult::Invalid(issues),
        }
    }
}
