pub mod error;
pub mod product;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use product::{MAX_DISCOUNT, Product, ProductCreate, ProductId};
