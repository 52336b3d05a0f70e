//! Repository Traits - The "Ports" of the Entity Store
//!
//! These traits define what the core needs from storage, not how it is done.
//! That's the adapter's job.
//!
//! ```text
//! Domain Layer                  │  Adapter Layer
//! ──────────────────────────────┼────────────────────────
//! trait RoleRepository          │  InMemoryStore
//! trait PermissionRepository    │  (SQL, document, ...)
//! trait RolePermissionRepository│
//! trait UserRoleRepository      │
//! ```
//!
//! Lookups return `Ok(None)` for a missing row; mutations report the number
//! of rows they touched. Turning either into a domain error is the core's job.
//! Implementations must make each single call atomic.

pub mod permission_repository;
pub mod role_permission_repository;
pub mod role_repository;
pub mod user_role_repository;

pub use permission_repository::PermissionRepository;
pub use role_permission_repository::RolePermissionRepository;
pub use role_repository::RoleRepository;
pub use user_role_repository::UserRoleRepository;

use thiserror::Error;

/// Failures reported by a store, unrelated to the domain rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or its state could not be locked
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A storage-level constraint rejected the write
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// Any other backend failure
    #[error("backend error: {0}")]
    Backend(String),
}

/// Everything the core needs from storage
///
/// Implemented automatically for any type providing all four ports.
pub trait EntityStore:
    RoleRepository + PermissionRepository + RolePermissionRepository + UserRoleRepository
{
}

impl<T> EntityStore for T where
    T: RoleRepository + PermissionRepository + RolePermissionRepository + UserRoleRepository
{
}
