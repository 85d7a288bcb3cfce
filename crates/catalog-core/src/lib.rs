//! Catalog Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the product
//! catalog client, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           catalog-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (ProductService, normalize)           │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │        (Driven: ProductGateway)         │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   catalog-adapters (Infrastructure)     │
//! │  (HttpProductGateway, MemoryGateway)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (RecordSchema, Product, ProductQuery)  │
//! │         No I/O, no async                │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use catalog_core::domain::{product_schema, validate_product};
//! use serde_json::json;
//!
//! let form = json!({ "name": "Desk lamp", "price": 5.99, "quantity": 150 });
//!
//! let result = validate_product(&form);
//! assert!(!result.is_valid());
//! assert_eq!(result.issues()[0].path, "quantity");
//!
//! // Field-level checks never report missing values.
//! assert!(product_schema().validate_field("price", &json!(null)).is_valid());
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ErrorType, FieldErrorMap, GatewayError, HttpFailure, NormalizedError, ProductService,
        normalize, ports::ProductGateway,
    };
    pub use crate::domain::{
        IssueCode, Page, Product, ProductDraft, ProductId, ProductQuery, RecordSchema, SortOrder,
        ValidationIssue, ValidationResult, product_schema, recommendations, validate_product,
    };
    pub use crate::error::{CatalogError, CatalogResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
