//! Application layer for the catalog client.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ProductService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Normalizer**: Backend failures to one display-ready error model
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! validation rules itself. Those live in `crate::domain`.

pub mod error;
pub mod normalizer;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::ProductService;

// Re-export port traits (for adapter implementation)
pub use ports::{GatewayError, GatewayResult, HttpFailure, ProductGateway};

pub use normalizer::{ErrorType, FieldErrorMap, NormalizedError, normalize};

pub use error::ApplicationError;
