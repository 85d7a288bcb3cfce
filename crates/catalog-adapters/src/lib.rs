//! Infrastructure adapters for the catalog client.
//!
//! This crate implements the ports defined in `catalog-core::application::ports`.
//! It contains all network access and async plumbing.

pub mod error;
pub mod gateway;
pub mod search;

// Re-export commonly used adapters
pub use error::AdapterError;
pub use gateway::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpGatewayConfig, HttpProductGateway, MemoryGateway,
};
pub use search::{DEFAULT_QUIET_PERIOD, SearchDebouncer};
