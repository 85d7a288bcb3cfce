//! Adapter construction errors.
//!
//! Request failures are not errors of this crate: they travel through the
//! port as `GatewayError` and are normalized by the core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}
