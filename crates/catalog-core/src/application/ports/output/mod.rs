//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `catalog-adapters` crate provides implementations.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{Page, Product, ProductDraft, ProductId, ProductQuery};

/// A failed HTTP exchange, as raw as the transport reports it.
///
/// `status` is `None` when no response arrived at all (DNS, refused
/// connection, timeout). `body` is the parsed JSON body when there was one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpFailure {
    pub status: Option<u16>,
    pub body: Option<Value>,
    pub message: String,
    pub method: Option<String>,
    pub url: Option<String>,
}

impl HttpFailure {
    /// No response was received.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
            method: None,
            url: None,
        }
    }

    /// The server answered with a non-success status.
    pub fn response(status: u16, body: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body,
            message: message.into(),
            method: None,
            url: None,
        }
    }

    pub fn with_request(mut self, method: impl Into<String>, url: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self.url = Some(url.into());
        self
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {status}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Why a gateway call did not produce a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    #[error("Request failed: {0}")]
    Failed(HttpFailure),

    /// The caller's cancellation token fired before the response arrived.
    #[error("Request cancelled")]
    Cancelled,
}

impl From<HttpFailure> for GatewayError {
    fn from(failure: HttpFailure) -> Self {
        Self::Failed(failure)
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Port for the product backend.
///
/// Implemented by:
/// - `catalog_adapters::gateway::HttpProductGateway` (production)
/// - `catalog_adapters::gateway::MemoryGateway` (testing, offline use)
///
/// ## Design Notes
///
/// - Payloads reaching `create`/`update` have already passed local validation
/// - Every call is cancellable; a cancelled call yields `GatewayError::Cancelled`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductGateway: Send + Sync {
    /// Fetch one page of products.
    async fn list(&self, query: &ProductQuery) -> GatewayResult<Page<Product>>;

    /// Fetch a single product.
    async fn get(&self, id: &ProductId) -> GatewayResult<Product>;

    /// Create a product and return it as stored.
    async fn create(&self, draft: &ProductDraft) -> GatewayResult<Product>;

    /// Replace a product's editable fields.
    async fn update(&self, id: &ProductId, draft: &ProductDraft) -> GatewayResult<Product>;

    /// Delete a product.
    async fn delete(&self, id: &ProductId) -> GatewayResult<()>;
}
