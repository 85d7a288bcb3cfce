//! Product gateway adapters.

mod http;
mod memory;

pub use http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpGatewayConfig, HttpProductGateway};
pub use memory::MemoryGateway;
