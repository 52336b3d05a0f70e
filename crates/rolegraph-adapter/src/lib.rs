//! # rolegraph Adapter Layer
//!
//! Entity Store implementations (Hexagonal Architecture adapters).
//!
//! ## Structure
//!
//! - `repository/` - Persistence implementations of the domain ports

pub mod repository;

pub use repository::in_memory::InMemoryStore;
