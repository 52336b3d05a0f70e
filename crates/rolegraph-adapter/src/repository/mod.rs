//! Persistence Adapters - Repository implementations
//!
//! These implement the repository traits from rolegraph-domain.

pub mod in_memory;
