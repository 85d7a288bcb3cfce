//! Translation of failed HTTP exchanges into one error model.
//!
//! The backend answers with either an RFC 7807 problem-detail document or an
//! older ad-hoc JSON shape, and sometimes with nothing at all. [`normalize`]
//! folds all of them into a [`NormalizedError`] with a classified
//! [`ErrorType`], a display message and optional per-field messages.
//!
//! Classification, first match wins:
//!
//! 1. No response: `client`, status 0
//! 2. Problem-detail body: type from the `type` URI's last segment
//! 3. Anything else: dispatch on the HTTP status

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::application::ports::HttpFailure;
use crate::domain::RecordSchema;

/// Field name to message. Ordered so rendering is stable.
pub type FieldErrorMap = BTreeMap<String, String>;

/// Key for field errors that name no field.
pub const GENERAL_FIELD: &str = "general";

pub const VALIDATION_MESSAGE: &str = "Validation failed. Please check the highlighted fields.";
pub const BAD_REQUEST_MESSAGE: &str = "Invalid request. Please check your input.";
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";
pub const CONFLICT_MESSAGE: &str = "Resource already exists";
pub const SERVER_ERROR_MESSAGE: &str = "Internal server error. Please try again later.";
pub const TRANSPORT_MESSAGE: &str = "Unable to reach the server. Check your connection.";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred";
pub const UNKNOWN_ERROR: &str = "Unknown error";

// ── ErrorType ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    Client,
    Validation,
    BusinessRule,
    BadRequest,
    NotFound,
    Conflict,
    ServerError,
    ParsingError,
    ConstraintViolation,
    TypeMismatch,
    MissingParameter,
    Unknown,
}

impl ErrorType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Validation => "validation",
            Self::BusinessRule => "business_rule",
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::ServerError => "server_error",
            Self::ParsingError => "parsing_error",
            Self::ConstraintViolation => "constraint_violation",
            Self::TypeMismatch => "type_mismatch",
            Self::MissingParameter => "missing_parameter",
            Self::Unknown => "unknown",
        }
    }

    /// Map a problem-detail type key (the last segment of its `type` URI).
    pub fn from_type_key(key: &str) -> Self {
        match key {
            "validation-error" => Self::Validation,
            "product-not-found" | "resource-not-found" => Self::NotFound,
            "product-already-exists" | "database-constraint-violation" => Self::Conflict,
            "invalid-argument" => Self::BadRequest,
            "constraint-violation" => Self::ConstraintViolation,
            "type-mismatch" => Self::TypeMismatch,
            "parsing-error" => Self::ParsingError,
            "missing-parameter" => Self::MissingParameter,
            "internal-server-error" => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Whether the user's input was at fault.
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Validation
                | Self::BusinessRule
                | Self::BadRequest
                | Self::ConstraintViolation
                | Self::TypeMismatch
                | Self::MissingParameter
                | Self::ParsingError
        )
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── NormalizedError ──────────────────────────────────────────────────────────

/// A backend failure in display-ready form. `message` is never empty.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct NormalizedError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrorMap>,
    /// The raw response body, kept for diagnostics only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<Value>,
}

impl NormalizedError {
    fn new(error_type: ErrorType, status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            message: if message.trim().is_empty() {
                UNEXPECTED_MESSAGE.into()
            } else {
                message
            },
            error_type,
            status: Some(status),
            field_errors: None,
            original: None,
        }
    }

    fn with_field_errors(mut self, field_errors: FieldErrorMap) -> Self {
        self.field_errors = (!field_errors.is_empty()).then_some(field_errors);
        self
    }

    fn with_original(mut self, body: Option<&Value>) -> Self {
        self.original = body.cloned();
        self
    }

    /// Client (no response) and server errors may succeed on a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self.error_type, ErrorType::Client | ErrorType::ServerError)
    }

    /// Split field errors into those naming a field of `schema` and the rest.
    ///
    /// The first map can annotate form fields; the second still has to be
    /// shown somewhere so nothing the server said is lost.
    pub fn known_field_errors(&self, schema: &RecordSchema) -> (FieldErrorMap, FieldErrorMap) {
        self.field_errors
            .iter()
            .flatten()
            .map(|(field, message)| (field.clone(), message.clone()))
            .partition(|(field, _)| schema.has_field(field))
    }
}

// ── normalize ────────────────────────────────────────────────────────────────

/// Classify a failed exchange. Never panics, never returns an empty message.
pub fn normalize(failure: &HttpFailure) -> NormalizedError {
    let normalized = classify(failure);

    let method = failure.method.as_deref().unwrap_or("-");
    let url = failure.url.as_deref().unwrap_or("-");
    let status = normalized.status.unwrap_or_default();
    if matches!(normalized.error_type, ErrorType::ServerError | ErrorType::Client) {
        error!(status, method, url, error_type = %normalized.error_type, message = %normalized.message, "HTTP request failed");
    } else {
        warn!(status, method, url, error_type = %normalized.error_type, message = %normalized.message, "HTTP request failed");
    }
    debug!(payload = ?failure.body, transport = %failure.message, "raw failure");

    normalized
}

fn classify(failure: &HttpFailure) -> NormalizedError {
    let Some(status) = failure.status else {
        let message = if failure.message.trim().is_empty() {
            TRANSPORT_MESSAGE
        } else {
            failure.message.as_str()
        };
        return NormalizedError::new(ErrorType::Client, 0, message);
    };

    let body = failure.body.as_ref().and_then(Value::as_object);

    if let Some(problem) = body.and_then(ProblemDetail::parse) {
        return from_problem_detail(&problem, status).with_original(failure.body.as_ref());
    }

    from_legacy(status, body, failure).with_original(failure.body.as_ref())
}

/// The fields of an RFC 7807 document that classification reads.
struct ProblemDetail<'a> {
    type_uri: &'a str,
    title: &'a str,
    detail: &'a str,
    errors: Option<&'a Vec<Value>>,
}

impl<'a> ProblemDetail<'a> {
    /// All of `type`, `title`, `status` and `detail` must be present with the
    /// right JSON types; otherwise the body is treated as the legacy shape.
    fn parse(body: &'a Map<String, Value>) -> Option<Self> {
        if !body.get("status")?.is_number() {
            return None;
        }
        Some(Self {
            type_uri: body.get("type")?.as_str()?,
            title: body.get("title")?.as_str()?,
            detail: body.get("detail")?.as_str()?,
            errors: body.get("errors").and_then(Value::as_array),
        })
    }

    fn type_key(&self) -> &'a str {
        self.type_uri
            .rsplit('/')
            .next()
            .filter(|key| !key.is_empty())
            .unwrap_or("unknown")
    }
}

fn from_problem_detail(problem: &ProblemDetail<'_>, status: u16) -> NormalizedError {
    let error_type = ErrorType::from_type_key(problem.type_key());

    if let Some(errors) = problem.errors.filter(|errors| !errors.is_empty()) {
        return NormalizedError::new(error_type, status, VALIDATION_MESSAGE)
            .with_field_errors(fold_field_errors(errors));
    }

    let message = [problem.detail, problem.title]
        .into_iter()
        .find(|text| !text.trim().is_empty())
        .unwrap_or(UNEXPECTED_MESSAGE);
    NormalizedError::new(error_type, status, message)
}

fn from_legacy(
    status: u16,
    body: Option<&Map<String, Value>>,
    failure: &HttpFailure,
) -> NormalizedError {
    let text = |key: &str| {
        body.and_then(|b| b.get(key))
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
    };
    let message_or_detail = || text("message").or_else(|| text("detail"));
    let errors = body.and_then(|b| b.get("errors"));

    match status {
        400 => {
            if let Some(errors) = errors
                .and_then(Value::as_array)
                .filter(|errors| !errors.is_empty())
            {
                NormalizedError::new(ErrorType::Validation, status, VALIDATION_MESSAGE)
                    .with_field_errors(fold_field_errors(errors))
            } else if let Some(message) = text("message") {
                NormalizedError::new(ErrorType::BusinessRule, status, message)
            } else {
                NormalizedError::new(ErrorType::BadRequest, status, BAD_REQUEST_MESSAGE)
            }
        }
        404 => NormalizedError::new(
            ErrorType::NotFound,
            status,
            message_or_detail().unwrap_or(NOT_FOUND_MESSAGE),
        ),
        409 => NormalizedError::new(
            ErrorType::Conflict,
            status,
            message_or_detail().unwrap_or(CONFLICT_MESSAGE),
        ),
        422 => NormalizedError::new(
            ErrorType::Validation,
            status,
            message_or_detail().unwrap_or(VALIDATION_MESSAGE),
        )
        .with_field_errors(errors.map(verbatim_field_errors).unwrap_or_default()),
        500 => NormalizedError::new(ErrorType::ServerError, status, SERVER_ERROR_MESSAGE),
        _ => {
            let detail = text("message")
                .or_else(|| Some(failure.message.as_str()).filter(|m| !m.trim().is_empty()))
                .unwrap_or(UNKNOWN_ERROR);
            NormalizedError::new(ErrorType::Unknown, status, format!("Error {status}: {detail}"))
        }
    }
}

/// Fold `[{field, message}, ...]` into a map. Entries without a field go
/// under [`GENERAL_FIELD`]; a later entry for the same field wins.
fn fold_field_errors(errors: &[Value]) -> FieldErrorMap {
    errors
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|entry| {
            let message = entry.get("message")?.as_str()?;
            let field = entry
                .get("field")
                .and_then(Value::as_str)
                .filter(|field| !field.is_empty())
                .unwrap_or(GENERAL_FIELD);
            Some((field.to_string(), message.to_string()))
        })
        .collect()
}

/// A 422 body's `errors` as sent: an object of field messages, or the array
/// shape used elsewhere.
fn verbatim_field_errors(errors: &Value) -> FieldErrorMap {
    match errors {
        Value::Object(map) => map
            .iter()
            .filter_map(|(field, message)| Some((field.clone(), message.as_str()?.to_string())))
            .collect(),
        Value::Array(entries) => fold_field_errors(entries),
        _ => FieldErrorMap::new(),
    }
}
