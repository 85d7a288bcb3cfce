//! Domain entities: the product resource and paginated result sets.

pub mod page;
pub mod product;

pub use page::Page;
pub use product::{Product, ProductDraft};
