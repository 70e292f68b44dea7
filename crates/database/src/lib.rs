//! # Product Database Crate
//!
//! This crate owns everything that touches the `product` table.
//!
//! ## Architectural Principles
//!
//! - **Capability, not inheritance:** callers depend on the [`ProductRepository`]
//!   trait. [`PgProductRepository`] talks to PostgreSQL; [`InMemoryProductRepository`]
//!   keeps rows in process and stands in for the database in tests.
//! - **Asynchronous & Pooled:** the PostgreSQL implementation borrows one connection
//!   from a `PgPool` per statement and returns it on every exit path.
//!
//! ## Public API
//!
//! - `connect`: builds the connection pool from [`configuration::DatabaseSettings`].
//! - `ProductRepository`: the data-access capability the service layer consumes.
//! - `fixtures`: the seed rows and the truncate helper used by the CLI and tests.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod fixtures;
pub mod memory;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::DbError;
pub use memory::InMemoryProductRepository;
pub use repository::{PgProductRepository, ProductRepository};
