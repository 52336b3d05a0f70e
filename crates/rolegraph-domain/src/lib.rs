//! # rolegraph Domain Layer
//!
//! Entities, storage ports and errors for the role / permission graph.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - Role, Permission, identifiers                 ││
//! │  │  repository/- Entity Store traits (not implementations)     ││
//! │  │  error      - RbacError taxonomy                            ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The graph has three kinds of nodes (roles, permissions and users) and two
//! many-to-many edges: role ↔ permission and user ↔ role. Users are opaque
//! identifiers; the store never holds a user row.

pub mod error;
pub mod model;
pub mod repository;

// Re-export commonly used types
pub use error::{BatchResult, ErrorKind, PartialResolution, RbacError, Result};

pub use model::{
    ids::{PermissionId, RoleId, UserId},
    permission::{NewPermission, Permission, PermissionRef},
    role::{NewRole, Role, RoleRef},
};

pub use repository::{
    EntityStore, PermissionRepository, RolePermissionRepository, RoleRepository, StoreError,
    UserRoleRepository,
};
