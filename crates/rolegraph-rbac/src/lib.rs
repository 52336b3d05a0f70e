//! # rolegraph RBAC
//!
//! Relationship management over the role / permission graph.
//!
//! ## Components
//!
//! - `Resolver` - Read-only traversal: user → roles → permissions
//! - `AssignmentManager` - Assign, revoke, clear and sync association rows
//! - `AccessControl` - The public facade composing both over an Entity Store
//!
//! ```text
//!                 ┌──────────────────────────┐
//!   caller ─────▶ │      AccessControl<S>    │
//!                 └──────┬────────────┬──────┘
//!                        │            │
//!                  ┌─────▼────┐ ┌─────▼─────────────┐
//!                  │ Resolver │ │ AssignmentManager │
//!                  └─────┬────┘ └─────┬─────────────┘
//!                        │            │
//!                 ┌──────▼────────────▼──────┐
//!                 │   S: EntityStore (port)  │
//!                 └──────────────────────────┘
//! ```
//!
//! Nothing here keeps state between calls. The store is passed in by the
//! caller, so independent instances never share data.

pub mod assignment;
pub mod facade;
pub mod resolver;

pub use assignment::AssignmentManager;
pub use facade::{AccessControl, PermissionHolders, RoleGrants};
pub use resolver::{role_names, Resolver};

pub use rolegraph_domain::{
    BatchResult, ErrorKind, NewPermission, NewRole, PartialResolution, Permission, PermissionId,
    PermissionRef, RbacError, Result, Role, RoleId, RoleRef, UserId,
};
