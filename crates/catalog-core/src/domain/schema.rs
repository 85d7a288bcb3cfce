//! Schema-driven record validation.
//!
//! A [`RecordSchema`] is an ordered list of [`FieldSchema`]s plus a list of
//! [`BusinessRule`]s. Field constraints are tagged variants evaluated by a
//! single dispatch loop; rules are explicit `(predicate, target)` pairs.
//!
//! Records are JSON objects (`serde_json::Value`), the shape a form or a
//! request body arrives in.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::trace;

use crate::domain::validation::{IssueCode, IssueContext, ValidationIssue, ValidationResult};

// ── Field schemas ────────────────────────────────────────────────────────────

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

/// One constraint on a field, carrying its own user-facing message.
///
/// Constraints run in declaration order. `Trim` rewrites the working text
/// value, so it must precede the length checks it should affect.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Trim,
    MinLength { len: usize, message: &'static str },
    MaxLength { len: usize, message: &'static str },
    /// Inclusive lower bound.
    Min { value: f64, message: &'static str },
    /// Inclusive upper bound.
    Max { value: f64, message: &'static str },
    MultipleOf { step: f64, message: &'static str },
    Integer { message: &'static str },
}

/// Schema for a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Message for a missing value; `None` makes the field optional.
    pub required: Option<&'static str>,
    /// Message for a value of the wrong JSON type.
    pub type_message: &'static str,
    pub constraints: Vec<Constraint>,
}

/// What checking one present value produced.
struct FieldOutcome {
    /// The coerced value, when the value had the right type.
    typed: Option<Value>,
    issues: Vec<ValidationIssue>,
}

impl FieldSchema {
    pub fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text, "Expected text")
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number, "Expected a number")
    }

    fn new(name: &'static str, kind: FieldKind, type_message: &'static str) -> Self {
        Self {
            name,
            kind,
            required: None,
            type_message,
            constraints: Vec::new(),
        }
    }

    pub fn required(mut self, message: &'static str) -> Self {
        self.required = Some(message);
        self
    }

    pub fn type_message(mut self, message: &'static str) -> Self {
        self.type_message = message;
        self
    }

    pub fn trim(self) -> Self {
        self.constraint(Constraint::Trim)
    }

    pub fn min_length(self, len: usize, message: &'static str) -> Self {
        self.constraint(Constraint::MinLength { len, message })
    }

    pub fn max_length(self, len: usize, message: &'static str) -> Self {
        self.constraint(Constraint::MaxLength { len, message })
    }

    pub fn min(self, value: f64, message: &'static str) -> Self {
        self.constraint(Constraint::Min { value, message })
    }

    pub fn max(self, value: f64, message: &'static str) -> Self {
        self.constraint(Constraint::Max { value, message })
    }

    pub fn multiple_of(self, step: f64, message: &'static str) -> Self {
        self.constraint(Constraint::MultipleOf { step, message })
    }

    pub fn integer(self, message: &'static str) -> Self {
        self.constraint(Constraint::Integer { message })
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }

    /// Check a present, non-blank value against every constraint.
    fn check(&self, value: &Value) -> FieldOutcome {
        match self.kind {
            FieldKind::Text => self.check_text(value),
            FieldKind::Number => self.check_number(value),
        }
    }

    fn check_text(&self, value: &Value) -> FieldOutcome {
        let Some(raw) = value.as_str() else {
            return self.wrong_type(value);
        };

        let mut text = raw;
        let mut issues = Vec::new();

        for constraint in &self.constraints {
            match constraint {
                Constraint::Trim => text = text.trim(),
                Constraint::MinLength { len, message } if text.chars().count() < *len => {
                    issues.push(self.issue(IssueCode::TooSmall, message).with_context(
                        IssueContext {
                            minimum: Some(*len as f64),
                            received: Some(value.clone()),
                            ..IssueContext::default()
                        },
                    ));
                }
                Constraint::MaxLength { len, message } if text.chars().count() > *len => {
                    issues.push(self.issue(IssueCode::TooBig, message).with_context(
                        IssueContext {
                            maximum: Some(*len as f64),
                            received: Some(value.clone()),
                            ..IssueContext::default()
                        },
                    ));
                }
                _ => {}
            }
        }

        FieldOutcome {
            typed: Some(Value::String(text.to_owned())),
            issues,
        }
    }

    fn check_number(&self, value: &Value) -> FieldOutcome {
        let Some(number) = value.as_f64().filter(|n| n.is_finite()) else {
            return self.wrong_type(value);
        };

        let mut issues = Vec::new();
        let mut integral = false;

        for constraint in &self.constraints {
            match constraint {
                Constraint::Min { value: min, message } if number < *min => {
                    issues.push(self.issue(IssueCode::TooSmall, message).with_context(
                        IssueContext {
                            minimum: Some(*min),
                            received: Some(value.clone()),
                            ..IssueContext::default()
                        },
                    ));
                }
                Constraint::Max { value: max, message } if number > *max => {
                    issues.push(self.issue(IssueCode::TooBig, message).with_context(
                        IssueContext {
                            maximum: Some(*max),
                            received: Some(value.clone()),
                            ..IssueContext::default()
                        },
                    ));
                }
                Constraint::MultipleOf { step, message } if !is_multiple_of(number, *step) => {
                    issues.push(
                        self.issue(IssueCode::NotMultipleOf, message)
                            .with_context(IssueContext {
                                multiple_of: Some(*step),
                                received: Some(value.clone()),
                                ..IssueContext::default()
                            }),
                    );
                }
                Constraint::Integer { message } => {
                    if number.fract() == 0.0 {
                        integral = true;
                    } else {
                        issues.push(
                            self.issue(IssueCode::NotInteger, message)
                                .with_received(value),
                        );
                    }
                }
                _ => {}
            }
        }

        // Integral values are re-emitted as JSON integers so they deserialize
        // into integer types even when they arrived as `50.0`.
        let typed = if integral && number.abs() < i64::MAX as f64 {
            Value::from(number as i64)
        } else {
            value.clone()
        };

        FieldOutcome {
            typed: Some(typed),
            issues,
        }
    }

    fn wrong_type(&self, value: &Value) -> FieldOutcome {
        FieldOutcome {
            typed: None,
            issues: vec![
                self.issue(IssueCode::InvalidType, self.type_message)
                    .with_received(value),
            ],
        }
    }

    fn issue(&self, code: IssueCode, message: &str) -> ValidationIssue {
        ValidationIssue::new(self.name, code, message)
    }
}

/// Decimal-exact multiple check: `19.99` is a multiple of `0.01`, `19.999`
/// is not. Both operands are scaled by the larger number of decimal places
/// they print with, then compared as integers.
pub fn is_multiple_of(value: f64, step: f64) -> bool {
    if step <= 0.0 || !step.is_finite() {
        return true;
    }

    let places = decimal_places(value).max(decimal_places(step));
    if places > 15 {
        return false;
    }

    let scale = 10f64.powi(places as i32);
    let scaled_value = (value * scale).round();
    let scaled_step = (step * scale).round();

    scaled_step != 0.0 && scaled_value % scaled_step == 0.0
}

fn decimal_places(value: f64) -> usize {
    value
        .to_string()
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len())
}

/// Absent, `null`, and `""` all mean "not provided".
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

// ── Business rules ───────────────────────────────────────────────────────────

/// Read-only view of the type-correct values of a record, handed to rules.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    values: &'a Map<String, Value>,
}

impl<'a> RuleInput<'a> {
    pub fn new(values: &'a Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.values.get(field).and_then(Value::as_f64)
    }

    pub fn text(&self, field: &str) -> Option<&'a str> {
        self.values.get(field).and_then(Value::as_str)
    }
}

/// A cross-field constraint.
///
/// `violated` returns `None` when a value it needs is missing or mistyped;
/// the rule is then skipped, since the field-level issue already covers it.
#[derive(Clone, Copy)]
pub struct BusinessRule {
    pub name: &'static str,
    /// Field path the violation attaches to.
    pub target: &'static str,
    pub message: &'static str,
    pub violated: fn(&RuleInput<'_>) -> Option<bool>,
}

impl fmt::Debug for BusinessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusinessRule")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl BusinessRule {
    fn evaluate(&self, input: &RuleInput<'_>) -> Option<ValidationIssue> {
        if !(self.violated)(input)? {
            return None;
        }
        Some(
            ValidationIssue::new(self.target, IssueCode::Custom, self.message).with_context(
                IssueContext {
                    rule: Some(self.name.to_owned()),
                    ..IssueContext::default()
                },
            ),
        )
    }
}

// ── Record schema ────────────────────────────────────────────────────────────

/// Ordered field schemas plus cross-field rules.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    fields: Vec<FieldSchema>,
    rules: Vec<BusinessRule>,
}

impl RecordSchema {
    pub fn new(fields: Vec<FieldSchema>, rules: Vec<BusinessRule>) -> Self {
        Self { fields, rules }
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn rules(&self) -> &[BusinessRule] {
        &self.rules
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Validate one field in isolation.
    ///
    /// Blank input is valid here: required-ness is only enforced by
    /// [`validate_record`](Self::validate_record), so an untouched form is
    /// not reported twice.
    pub fn validate_field(&self, name: &str, value: &Value) -> ValidationResult<Value> {
        let Some(field) = self.field(name) else {
            return ValidationResult::Invalid(vec![ValidationIssue::new(
                name,
                IssueCode::InvalidType,
                format!("Unknown field: {name}"),
            )]);
        };

        if is_blank(Some(value)) {
            return ValidationResult::Valid(value.clone());
        }

        let outcome = field.check(value);
        ValidationResult::from_parts(outcome.typed.unwrap_or(Value::Null), outcome.issues)
    }

    /// Validate a whole record: every field, then every business rule.
    ///
    /// The valid value holds the coerced fields (trimmed text, integral
    /// numbers as integers); optional fields that were not provided are
    /// omitted. Keys that no field declares are dropped.
    pub fn validate_record(&self, record: &Value) -> ValidationResult<Map<String, Value>> {
        let Some(object) = record.as_object() else {
            return ValidationResult::Invalid(vec![
                ValidationIssue::record(IssueCode::InvalidType, "Expected an object")
                    .with_received(record),
            ]);
        };

        let mut issues = Vec::new();
        let mut coerced = Map::new();
        let mut typed = Map::new();

        for field in &self.fields {
            let value = object.get(field.name);

            if is_blank(value) {
                if let Some(message) = field.required {
                    issues.push(ValidationIssue::new(field.name, IssueCode::Required, message));
                }
                continue;
            }

            // Not blank, so present.
            let Some(value) = value else { continue };
            let outcome = field.check(value);

            if let Some(v) = outcome.typed {
                if outcome.issues.is_empty() {
                    coerced.insert(field.name.to_owned(), v.clone());
                }
                typed.insert(field.name.to_owned(), v);
            }
            issues.extend(outcome.issues);
        }

        let input = RuleInput::new(&typed);
        for rule in &self.rules {
            if let Some(issue) = rule.evaluate(&input) {
                trace!(rule = rule.name, target = rule.target, "business rule violated");
                issues.push(issue);
            }
        }

        ValidationResult::from_parts(coerced, issues)
    }

    /// The typed value if the record validates, `None` otherwise.
    pub fn extract_typed<T: DeserializeOwned>(&self, record: &Value) -> Option<T> {
        self.validate_record(record)
            .into_value()
            .and_then(|map| serde_json::from_value(Value::Object(map)).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> RecordSchema {
        RecordSchema::new(
            vec![
                FieldSchema::text("title")
                    .trim()
                    .min_length(2, "too short")
                    .required("title required"),
                FieldSchema::number("width").min(1.0, "too narrow").max(10.0, "too wide"),
                FieldSchema::number("height").integer("whole height"),
            ],
            vec![BusinessRule {
                name: "square",
                target: "height",
                message: "must not be square",
                violated: |r| Some(r.number("width")? == r.number("height")?),
            }],
        )
    }

    #[test]
    fn multiple_of_is_decimal_exact() {
        assert!(is_multiple_of(19.99, 0.01));
        assert!(is_multiple_of(0.01, 0.01));
        assert!(is_multiple_of(999_999.99, 0.01));
        assert!(is_multiple_of(100.0, 0.01));
        assert!(!is_multiple_of(19.999, 0.01));
        assert!(!is_multiple_of(0.009, 0.01));
        assert!(is_multiple_of(0.3, 0.1));
    }

    #[test]
    fn trim_applies_before_length() {
        let result = schema().validate_field("title", &json!("  a  "));
        assert_eq!(result.issues()[0].code, IssueCode::TooSmall);

        let ok = schema().validate_field("title", &json!("  ab  "));
        assert_eq!(ok.into_value(), Some(json!("ab")));
    }

    #[test]
    fn every_failing_constraint_is_reported() {
        let result = schema().validate_record(&json!({ "title": "x", "width": 0.5, "height": 1.5 }));
        let codes: Vec<_> = result.issues().iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![IssueCode::TooSmall, IssueCode::TooSmall, IssueCode::NotInteger]
        );
    }

    #[test]
    fn rules_skip_when_inputs_are_mistyped() {
        let result = schema().validate_record(&json!({ "title": "ok", "width": "3", "height": 3 }));
        assert_eq!(result.issues().len(), 1);
        assert_eq!(result.issues()[0].code, IssueCode::InvalidType);
    }

    #[test]
    fn rules_still_run_when_a_bound_fails() {
        let result = schema().validate_record(&json!({ "title": "ok", "width": 12, "height": 12 }));
        let codes: Vec<_> = result.issues().iter().map(|i| i.code).collect();
        assert_eq!(codes, vec![IssueCode::TooBig, IssueCode::Custom]);
        assert_eq!(result.issues()[1].context.rule.as_deref(), Some("square"));
    }

    #[test]
    fn non_object_record_is_one_record_level_issue() {
        let result = schema().validate_record(&json!([1, 2]));
        assert_eq!(result.issues().len(), 1);
        assert!(result.issues()[0].is_record_level());
    }

    #[test]
    fn integral_floats_are_coerced_to_integers() {
        let value = schema()
            .validate_record(&json!({ "title": "ok", "height": 4.0 }))
            .into_value()
            .unwrap();
        assert!(value["height"].is_i64());
        assert!(!value.contains_key("width"));
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let value = schema()
            .validate_record(&json!({ "title": "ok", "extra": true }))
            .into_value()
            .unwrap();
        assert!(!value.contains_key("extra"));
    }
}
