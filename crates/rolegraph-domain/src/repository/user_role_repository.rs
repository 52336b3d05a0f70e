//! User ↔ Role association
//!
//! Users exist only as identifiers inside these rows.

use crate::model::ids::{RoleId, UserId};
use crate::repository::StoreError;

pub trait UserRoleRepository: Send + Sync {
    /// Role ids held by the user, in assignment order
    fn role_ids_of_user(&self, user_id: UserId) -> Result<Vec<RoleId>, StoreError>;

    /// Insert the pair unless present. Returns `true` when a row was inserted.
    fn insert_user_role(&self, user_id: UserId, role_id: RoleId) -> Result<bool, StoreError>;

    /// Remove a single pair; returns rows removed
    fn delete_user_role(&self, user_id: UserId, role_id: RoleId) -> Result<usize, StoreError>;

    /// Remove every pair of the user; returns rows removed
    fn delete_user_roles(&self, user_id: UserId) -> Result<usize, StoreError>;

    /// Atomically make `role_ids` the complete role set of the user.
    ///
    /// Returns the number of rows removed before inserting.
    fn replace_user_roles(&self, user_id: UserId, role_ids: &[RoleId])
        -> Result<usize, StoreError>;

    /// Number of users holding the role
    fn count_users_with_role(&self, role_id: RoleId) -> Result<usize, StoreError>;
}
