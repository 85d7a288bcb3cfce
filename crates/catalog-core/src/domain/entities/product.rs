//! The product resource, as stored by the backend and as submitted to it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::value_objects::ProductId;

/// A product as returned by the backend.
///
/// `description` may be `null` on the wire; both `null` and absence map to
/// `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<ProductId>,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// The editable part of this product, e.g. to seed an update form.
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            price: self.price,
            quantity: self.quantity,
            description: self.description.clone().filter(|d| !d.is_empty()),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} x {})", self.name, self.price, self.quantity)
    }
}

/// A validated create/update payload.
///
/// Only produced by [`validate_product`](crate::domain::validate_product),
/// so every value is already within bounds and trimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProductDraft {
    /// The draft as a form record, for re-validation after edits.
    pub fn to_record(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_description_deserializes_to_none() {
        let product: Product = serde_json::from_value(json!({
            "publicId": "3f2c8a1e-5b7d-4c1a-9e0f-2a6b8c4d1e3f",
            "name": "Lamp",
            "price": 19.99,
            "quantity": 3,
            "description": null
        }))
        .unwrap();

        assert!(product.description.is_none());
        assert!(product.public_id.is_some());
    }

    #[test]
    fn draft_omits_missing_description() {
        let draft = ProductDraft {
            name: "Lamp".into(),
            price: 19.99,
            quantity: 3,
            description: None,
        };
        let record = draft.to_record();
        assert!(record.get("description").is_none());
        assert_eq!(record["name"], "Lamp");
    }

    #[test]
    fn to_draft_drops_empty_description() {
        let product = Product {
            public_id: None,
            name: "Lamp".into(),
            price: 1.0,
            quantity: 1,
            description: Some(String::new()),
        };
        assert_eq!(product.to_draft().description, None);
    }
}
