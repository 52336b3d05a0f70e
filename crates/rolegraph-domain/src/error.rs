//! Error types for rolegraph
//!
//! Every failure the core reports is an [`RbacError`]. Variants fall into a
//! small set of kinds (see [`ErrorKind`]) so callers can branch on the class
//! of failure without matching every variant:
//!
//! ```text
//! NotFound           RoleNotFound, PermissionNotFound, UserHasNoRoles,
//!                    DanglingRole, PermissionNotGranted
//! AssignedElsewhere  RoleAssigned, PermissionAssigned
//! CannotMutate       NothingToUpdate, NothingToDelete
//! InvalidInput       PositionalOverrun
//! Underlying         Store
//! ```
//!
//! Assigning a pair that already exists is not an error at all.

use thiserror::Error;

use crate::model::ids::{PermissionId, RoleId, UserId};
use crate::model::permission::PermissionRef;
use crate::model::role::RoleRef;
use crate::repository::StoreError;

/// Class of an [`RbacError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A primary-key or natural-key lookup failed
    NotFound,
    /// A delete was blocked by dependent association rows
    AssignedElsewhere,
    /// An update, delete or revoke affected zero rows
    CannotMutate,
    /// The caller's arguments cannot be evaluated
    InvalidInput,
    /// The store failed for reasons of its own
    Underlying,
}

/// General rolegraph error type
#[derive(Debug, Error)]
pub enum RbacError {
    #[error("role {0} not found")]
    RoleNotFound(RoleRef),

    #[error("permission {0} not found")]
    PermissionNotFound(PermissionRef),

    #[error("user {0} has no roles")]
    UserHasNoRoles(UserId),

    /// A user-role row points at a role that no longer exists
    #[error("user {user_id} references missing role #{role_id}")]
    DanglingRole { user_id: UserId, role_id: RoleId },

    #[error("role #{role_id} is not granted permission '{permission}'")]
    PermissionNotGranted { role_id: RoleId, permission: String },

    #[error("role #{role_id} is assigned to {users} user(s)")]
    RoleAssigned { role_id: RoleId, users: usize },

    #[error("permission #{permission_id} is linked to {roles} role(s)")]
    PermissionAssigned {
        permission_id: PermissionId,
        roles: usize,
    },

    #[error("cannot update {0}: no matching row")]
    NothingToUpdate(String),

    #[error("cannot delete {0}: no matching row")]
    NothingToDelete(String),

    /// The stored sequence is longer than the list it was compared against
    #[error("positional check ran past the supplied names ({stored} stored, {supplied} supplied)")]
    PositionalOverrun { stored: usize, supplied: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RbacError {
    /// Returns the class of failure
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RoleNotFound(_)
            | Self::PermissionNotFound(_)
            | Self::UserHasNoRoles(_)
            | Self::DanglingRole { .. }
            | Self::PermissionNotGranted { .. } => ErrorKind::NotFound,
            Self::RoleAssigned { .. } | Self::PermissionAssigned { .. } => {
                ErrorKind::AssignedElsewhere
            }
            Self::NothingToUpdate(_) | Self::NothingToDelete(_) => ErrorKind::CannotMutate,
            Self::PositionalOverrun { .. } => ErrorKind::InvalidInput,
            Self::Store(_) => ErrorKind::Underlying,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

pub type Result<T> = std::result::Result<T, RbacError>;

/// A batch operation that stopped at the first name it could not resolve.
///
/// `resolved` holds the entities resolved before the failure, in input order.
/// Nothing was written to the store.
#[derive(Debug)]
pub struct PartialResolution<T> {
    pub resolved: Vec<T>,
    pub error: RbacError,
}

impl<T> PartialResolution<T> {
    pub fn new(resolved: Vec<T>, error: RbacError) -> Self {
        Self { resolved, error }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// Drop the partial list and keep the cause
    pub fn into_error(self) -> RbacError {
        self.error
    }
}

impl<T> core::fmt::Display for PartialResolution<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} ({} resolved before failure)",
            self.error,
            self.resolved.len()
        )
    }
}

impl<T: core::fmt::Debug> std::error::Error for PartialResolution<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<RbacError> for PartialResolution<T> {
    fn from(error: RbacError) -> Self {
        Self::new(Vec::new(), error)
    }
}

impl<T> From<StoreError> for PartialResolution<T> {
    fn from(error: StoreError) -> Self {
        Self::new(Vec::new(), RbacError::Store(error))
    }
}

/// Result of a batch name resolution followed by a write
pub type BatchResult<T> = std::result::Result<Vec<T>, PartialResolution<T>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            RbacError::RoleNotFound(RoleRef::from("ghost")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            RbacError::RoleAssigned {
                role_id: RoleId::new(1),
                users: 2
            }
            .kind(),
            ErrorKind::AssignedElsewhere
        );
        assert_eq!(
            RbacError::NothingToDelete("user 1 roles".into()).kind(),
            ErrorKind::CannotMutate
        );
        assert_eq!(
            RbacError::from(StoreError::Backend("disk full".into())).kind(),
            ErrorKind::Underlying
        );
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = RbacError::from(StoreError::Unavailable("connection refused".into()));
        assert_eq!(err.to_string(), "store unavailable: connection refused");
    }

    #[test]
    fn test_partial_resolution_keeps_resolved() {
        let partial = PartialResolution::new(
            vec!["a", "b"],
            RbacError::PermissionNotFound(PermissionRef::from("c")),
        );
        assert_eq!(partial.resolved, vec!["a", "b"]);
        assert_eq!(partial.kind(), ErrorKind::NotFound);
        assert!(partial.to_string().contains("2 resolved"));
    }

    #[test]
    fn test_partial_resolution_from_error_is_empty() {
        let partial: PartialResolution<u8> =
            RbacError::RoleNotFound(RoleRef::Id(RoleId::new(9))).into();
        assert!(partial.resolved.is_empty());
        assert!(partial.into_error().is_not_found());
    }
}
