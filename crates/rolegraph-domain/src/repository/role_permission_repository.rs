//! Role ↔ Permission association
//!
//! Link rows are unordered pairs without identity of their own. Lists come
//! back in the order the links were created.

use crate::model::ids::{PermissionId, RoleId};
use crate::model::permission::Permission;
use crate::model::role::Role;
use crate::repository::StoreError;

pub trait RolePermissionRepository: Send + Sync {
    /// Permissions linked to the role
    fn permissions_of_role(&self, role_id: RoleId) -> Result<Vec<Permission>, StoreError>;

    /// Roles linked to the permission
    fn roles_of_permission(&self, permission_id: PermissionId) -> Result<Vec<Role>, StoreError>;

    fn count_permissions_of_role(&self, role_id: RoleId) -> Result<usize, StoreError>;

    fn count_roles_of_permission(&self, permission_id: PermissionId) -> Result<usize, StoreError>;

    /// Link every permission to the role. Existing pairs are left alone.
    fn append_permissions_to_role(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> Result<(), StoreError>;

    /// Make `permission_ids` the complete permission set of the role
    fn replace_permissions_of_role(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> Result<(), StoreError>;

    /// Unlink every permission from the role; returns rows removed
    fn clear_permissions_of_role(&self, role_id: RoleId) -> Result<usize, StoreError>;

    /// Make `role_ids` the complete role set of the permission
    fn replace_roles_of_permission(
        &self,
        permission_id: PermissionId,
        role_ids: &[RoleId],
    ) -> Result<(), StoreError>;

    /// Unlink every role from the permission; returns rows removed
    fn clear_roles_of_permission(&self, permission_id: PermissionId) -> Result<usize, StoreError>;

    /// Remove a single pair; returns rows removed
    fn delete_role_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<usize, StoreError>;
}
