//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "create a product" or "load a page".

pub mod product_service;

pub use product_service::ProductService;
