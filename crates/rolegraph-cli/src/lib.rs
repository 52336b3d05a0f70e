//! # rolegraph CLI
//!
//! Wires an Entity Store into [`AccessControl`](rolegraph_rbac::AccessControl),
//! bootstraps it from a seed file and answers queries against it.

pub mod commands;
pub mod seed;

pub use seed::{SeedConfig, SeedError, SeedReport};
