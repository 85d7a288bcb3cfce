//! The product schema: field constraints, business rules, and advisory bands.
//!
//! # Adding a rule
//!
//! 1. Add a `BusinessRule` to `PRODUCT_RULES` with the field it attaches to
//! 2. Add its message to `messages`
//! 3. Done. `validate_record` picks it up in declaration order

use std::sync::LazyLock;

use serde_json::Value;

use crate::domain::entities::ProductDraft;
use crate::domain::schema::{BusinessRule, FieldSchema, RecordSchema, RuleInput};
use crate::domain::validation::{IssueCode, ValidationIssue, ValidationResult};

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 100;
pub const PRICE_MIN: f64 = 0.01;
pub const PRICE_MAX: f64 = 999_999.99;
pub const PRICE_STEP: f64 = 0.01;
pub const QUANTITY_MIN: f64 = 0.0;
pub const QUANTITY_MAX: f64 = 999_999.0;
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// User-facing messages, kept together so the wording stays consistent.
pub mod messages {
    pub const NAME_REQUIRED: &str = "Name is required";
    pub const NAME_LENGTH: &str = "Name must be between 3 and 100 characters";
    pub const NAME_TYPE: &str = "Name must be text";

    pub const PRICE_REQUIRED: &str = "Price is required";
    pub const PRICE_TYPE: &str = "Price must be a valid number";
    pub const PRICE_MIN: &str = "Price must be greater than zero";
    pub const PRICE_MAX: &str = "Price cannot exceed 999,999.99";
    pub const PRICE_PRECISION: &str = "Price must have at most 2 decimal places";

    pub const QUANTITY_REQUIRED: &str = "Quantity is required";
    pub const QUANTITY_TYPE: &str = "Quantity must be a valid number";
    pub const QUANTITY_INTEGER: &str = "Quantity must be a whole number";
    pub const QUANTITY_MIN: &str = "Quantity cannot be negative";
    pub const QUANTITY_MAX: &str = "Quantity cannot exceed 999,999";

    pub const DESCRIPTION_TYPE: &str = "Description must be text";
    pub const DESCRIPTION_MAX: &str = "Description cannot exceed 500 characters";

    pub const LOW_VALUE_HIGH_QUANTITY: &str =
        "Low-value products (price < 10) cannot have quantity greater than 100";
    pub const HIGH_VALUE_HIGH_QUANTITY: &str =
        "High-value products (price > 10000) must have quantity less than or equal to 10";
}

pub const LOW_VALUE_HIGH_QUANTITY: &str = "low_value_high_quantity";
pub const HIGH_VALUE_HIGH_QUANTITY: &str = "high_value_high_quantity";

const PRODUCT_RULES: [BusinessRule; 2] = [
    BusinessRule {
        name: LOW_VALUE_HIGH_QUANTITY,
        target: "quantity",
        message: messages::LOW_VALUE_HIGH_QUANTITY,
        violated: |r| Some(r.number("price")? < 10.0 && r.number("quantity")? > 100.0),
    },
    BusinessRule {
        name: HIGH_VALUE_HIGH_QUANTITY,
        target: "quantity",
        message: messages::HIGH_VALUE_HIGH_QUANTITY,
        violated: |r| Some(r.number("price")? > 10_000.0 && r.number("quantity")? > 10.0),
    },
];

static PRODUCT_SCHEMA: LazyLock<RecordSchema> = LazyLock::new(|| {
    RecordSchema::new(
        vec![
            FieldSchema::text("name")
                .type_message(messages::NAME_TYPE)
                .trim()
                .min_length(NAME_MIN_LEN, messages::NAME_LENGTH)
                .max_length(NAME_MAX_LEN, messages::NAME_LENGTH)
                .required(messages::NAME_REQUIRED),
            FieldSchema::number("price")
                .type_message(messages::PRICE_TYPE)
                .min(PRICE_MIN, messages::PRICE_MIN)
                .max(PRICE_MAX, messages::PRICE_MAX)
                .multiple_of(PRICE_STEP, messages::PRICE_PRECISION)
                .required(messages::PRICE_REQUIRED),
            FieldSchema::number("quantity")
                .type_message(messages::QUANTITY_TYPE)
                .integer(messages::QUANTITY_INTEGER)
                .min(QUANTITY_MIN, messages::QUANTITY_MIN)
                .max(QUANTITY_MAX, messages::QUANTITY_MAX)
                .required(messages::QUANTITY_REQUIRED),
            FieldSchema::text("description")
                .type_message(messages::DESCRIPTION_TYPE)
                .max_length(DESCRIPTION_MAX_LEN, messages::DESCRIPTION_MAX),
        ],
        PRODUCT_RULES.to_vec(),
    )
});

/// The process-wide product schema.
pub fn product_schema() -> &'static RecordSchema {
    &PRODUCT_SCHEMA
}

/// Validate a product form and produce the typed draft.
pub fn validate_product(record: &Value) -> ValidationResult<ProductDraft> {
    match product_schema().validate_record(record) {
        ValidationResult::Valid(map) => match serde_json::from_value(Value::Object(map)) {
            Ok(draft) => ValidationResult::Valid(draft),
            // Unreachable for the product schema: every coerced field fits
            // the draft's types.
            Err(e) => ValidationResult::Invalid(vec![ValidationIssue::record(
                IssueCode::InvalidType,
                e.to_string(),
            )]),
        },
        ValidationResult::Invalid(issues) => ValidationResult::Invalid(issues),
    }
}

// ── Advisory bands ───────────────────────────────────────────────────────────

struct Advisory {
    applies: fn(f64, f64) -> bool,
    message: &'static str,
}

/// Checked in order: low-value, high-value, luxury.
const ADVISORIES: [Advisory; 3] = [
    Advisory {
        applies: |price, quantity| price < 10.0 && quantity > 50.0,
        message: "Consider reducing quantity for low-value products to improve inventory turnover",
    },
    Advisory {
        applies: |price, quantity| price > 5_000.0 && quantity > 20.0,
        message: "High-value products typically have lower quantities in stock",
    },
    Advisory {
        applies: |price, quantity| price > 10_000.0 && quantity > 10.0,
        message: "Luxury items should have limited quantities (max 10 units)",
    },
];

/// Soft suggestions for a price/quantity pair. Never blocks a submission.
pub fn recommendations(price: Option<f64>, quantity: Option<f64>) -> Vec<&'static str> {
    let (Some(price), Some(quantity)) = (price, quantity) else {
        return Vec::new();
    };

    ADVISORIES
        .iter()
        .filter(|a| (a.applies)(price, quantity))
        .map(|a| a.message)
        .collect()
}

/// Recommendations for a raw record, reading whatever numbers it holds.
pub fn record_recommendations(record: &Value) -> Vec<&'static str> {
    let Some(object) = record.as_object() else {
        return Vec::new();
    };
    let input = RuleInput::new(object);
    recommendations(input.number("price"), input.number("quantity"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendations_follow_band_order() {
        let all = recommendations(Some(15_000.0), Some(30.0));
        assert_eq!(all.len(), 2);
        assert!(all[0].starts_with("High-value"));
        assert!(all[1].starts_with("Luxury"));

        let low = recommendations(Some(5.0), Some(60.0));
        assert_eq!(low.len(), 1);
        assert!(low[0].contains("low-value"));
    }

    #[test]
    fn recommendations_need_both_values() {
        assert!(recommendations(None, Some(500.0)).is_empty());
        assert!(recommendations(Some(1.0), None).is_empty());
        assert!(recommendations(Some(50.0), Some(50.0)).is_empty());
    }

    #[test]
    fn record_recommendations_ignore_mistyped_values() {
        let record = serde_json::json!({ "price": "5", "quantity": 60 });
        assert!(record_recommendations(&record).is_empty());
    }
}
