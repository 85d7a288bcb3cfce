// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for the catalog client.
//!
//! Pure logic only: schemas and the validation engine, the product model,
//! and listing queries. Network access and error translation live in the
//! application layer and the adapters.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Static schemas**: Built once, shared read-only
//! - **Per-call results**: Validation outcomes are never cached
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod query;
pub mod rules;
pub mod schema;
pub mod validation;
pub mod value_objects;

// Re-exports for convenience
pub use entities::{Page, Product, ProductDraft};

pub use error::DomainError;

pub use query::ProductQuery;

pub use rules::{product_schema, recommendations, record_recommendations, validate_product};

pub use schema::{BusinessRule, Constraint, FieldKind, FieldSchema, RecordSchema, RuleInput};

pub use validation::{IssueCode, IssueContext, ValidationIssue, ValidationResult, issues_by_field};

pub use value_objects::{ProductId, SortDirection, SortOrder};
