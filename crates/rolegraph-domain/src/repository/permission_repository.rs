//! Permission Repository - Abstract persistence for permissions

use crate::model::ids::PermissionId;
use crate::model::permission::{NewPermission, Permission};
use crate::repository::StoreError;

/// Permission Repository Trait
///
/// Mirrors [`RoleRepository`](super::RoleRepository) for permissions.
pub trait PermissionRepository: Send + Sync {
    fn get_permission(&self, id: PermissionId) -> Result<Option<Permission>, StoreError>;

    fn get_permission_by_name(&self, name: &str) -> Result<Option<Permission>, StoreError>;

    fn find_or_create_permission(
        &self,
        template: &NewPermission,
    ) -> Result<(Permission, bool), StoreError>;

    fn update_permission(
        &self,
        id: PermissionId,
        fields: &NewPermission,
    ) -> Result<usize, StoreError>;

    fn delete_permission(&self, id: PermissionId) -> Result<usize, StoreError>;

    fn list_permissions(&self) -> Result<Vec<Permission>, StoreError>;
}
