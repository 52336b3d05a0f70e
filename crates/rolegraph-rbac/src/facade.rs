//! AccessControl - The public surface of rolegraph
//!
//! Owns the Entity Store handed in by the caller and exposes entity CRUD,
//! the resolver queries and the assignment operations in one place.
//!
//! ```ignore
//! let acl = AccessControl::new(InMemoryStore::new());
//! let editor = acl.find_or_create_role(&NewRole::new("editor", "Edits content"))?;
//! acl.find_or_create_permission(&NewPermission::new("manage-articles", ""))?;
//! acl.assign_permissions_to_role(editor.id, &["manage-articles"])?;
//! acl.assign_roles_to_user(UserId::new(42), &["editor"])?;
//! assert!(acl.has_any_permission(UserId::new(42), &["manage-articles"])?);
//! ```

use rolegraph_domain::{
    BatchResult, EntityStore, NewPermission, NewRole, Permission, PermissionId, PermissionRef,
    RbacError, Result, Role, RoleId, RoleRef, UserId,
};
use tracing::{info, warn};

use crate::assignment::AssignmentManager;
use crate::resolver::Resolver;

/// A role together with the permissions linked to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrants {
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// A permission together with the roles linked to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionHolders {
    pub permission: Permission,
    pub roles: Vec<Role>,
}

/// Query facade over an Entity Store
#[derive(Debug, Clone, Default)]
pub struct AccessControl<S> {
    store: S,
}

impl<S: EntityStore> AccessControl<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn resolver(&self) -> Resolver<'_, S> {
        Resolver::new(&self.store)
    }

    pub fn assignments(&self) -> AssignmentManager<'_, S> {
        AssignmentManager::new(&self.store)
    }

    // ========== Roles ==========

    pub fn find_role_by_id(&self, id: RoleId) -> Result<Role> {
        self.resolver().role_by_id(id)
    }

    pub fn find_role_by_name(&self, name: &str) -> Result<Role> {
        self.resolver().role_by_name(name)
    }

    /// Return the role equal to `template` (name and description), creating it if absent
    pub fn find_or_create_role(&self, template: &NewRole) -> Result<Role> {
        let (role, created) = self.store.find_or_create_role(template)?;
        if created {
            info!(role_id = %role.id, role = %role.name, "created role");
        }
        Ok(role)
    }

    /// Overwrite the role's non-empty fields
    pub fn update_role(&self, id: RoleId, fields: &NewRole) -> Result<bool> {
        self.resolver().role_by_id(id)?;
        if self.store.update_role(id, fields)? == 0 {
            warn!(role_id = %id, "role update changed no rows");
            return Err(RbacError::NothingToUpdate(format!("role #{}", id)));
        }
        info!(role_id = %id, "updated role");
        Ok(true)
    }

    /// Delete the role unless some user still holds it.
    ///
    /// Permission links do not block the delete; they go with the role.
    pub fn delete_role(&self, id: RoleId) -> Result<bool> {
        let users = self.store.count_users_with_role(id)?;
        if users > 0 {
            warn!(role_id = %id, users, "role delete blocked by user assignments");
            return Err(RbacError::RoleAssigned { role_id: id, users });
        }
        if self.store.delete_role(id)? == 0 {
            warn!(role_id = %id, "role delete changed no rows");
            return Err(RbacError::NothingToDelete(format!("role #{}", id)));
        }
        info!(role_id = %id, "deleted role");
        Ok(true)
    }

    /// Every role with its permissions
    pub fn list_roles(&self) -> Result<Vec<RoleGrants>> {
        self.store
            .list_roles()?
            .into_iter()
            .map(|role| -> Result<RoleGrants> {
                let permissions = self.store.permissions_of_role(role.id)?;
                Ok(RoleGrants { role, permissions })
            })
            .collect()
    }

    // ========== Permissions ==========

    pub fn find_permission_by_id(&self, id: PermissionId) -> Result<Permission> {
        self.resolver().permission_by_id(id)
    }

    pub fn find_permission_by_name(&self, name: &str) -> Result<Permission> {
        self.resolver().permission_by_name(name)
    }

    pub fn find_or_create_permission(&self, template: &NewPermission) -> Result<Permission> {
        let (permission, created) = self.store.find_or_create_permission(template)?;
        if created {
            info!(permission_id = %permission.id, permission = %permission.name, "created permission");
        }
        Ok(permission)
    }

    pub fn update_permission(&self, id: PermissionId, fields: &NewPermission) -> Result<bool> {
        self.resolver().permission_by_id(id)?;
        if self.store.update_permission(id, fields)? == 0 {
            warn!(permission_id = %id, "permission update changed no rows");
            return Err(RbacError::NothingToUpdate(format!("permission #{}", id)));
        }
        info!(permission_id = %id, "updated permission");
        Ok(true)
    }

    /// Delete the permission unless some role is still linked to it
    pub fn delete_permission(&self, id: PermissionId) -> Result<bool> {
        self.resolver().permission_by_id(id)?;
        let roles = self.store.count_roles_of_permission(id)?;
        if roles > 0 {
            warn!(permission_id = %id, roles, "permission delete blocked by role links");
            return Err(RbacError::PermissionAssigned {
                permission_id: id,
                roles,
            });
        }
        if self.store.delete_permission(id)? == 0 {
            return Err(RbacError::NothingToDelete(format!("permission #{}", id)));
        }
        info!(permission_id = %id, "deleted permission");
        Ok(true)
    }

    /// Every permission with the roles linked to it
    pub fn list_permissions(&self) -> Result<Vec<PermissionHolders>> {
        self.store
            .list_permissions()?
            .into_iter()
            .map(|permission| -> Result<PermissionHolders> {
                let roles = self.store.roles_of_permission(permission.id)?;
                Ok(PermissionHolders { permission, roles })
            })
            .collect()
    }

    // ========== Resolution ==========

    pub fn roles_for_permissions<N: AsRef<str>>(&self, names: &[N]) -> Result<Vec<Role>> {
        self.resolver().roles_for_permissions(names)
    }

    pub fn permissions_for_roles<N: AsRef<str>>(&self, names: &[N]) -> Result<Vec<Permission>> {
        self.resolver().permissions_for_roles(names)
    }

    pub fn effective_roles(&self, user_id: UserId) -> Result<Vec<Role>> {
        self.resolver().effective_roles(user_id)
    }

    pub fn effective_role_names(&self, user_id: UserId) -> Result<Vec<String>> {
        self.resolver().effective_role_names(user_id)
    }

    pub fn effective_permissions(&self, user_id: UserId) -> Result<Vec<Permission>> {
        self.resolver().effective_permissions(user_id)
    }

    pub fn effective_permission_set(&self, user_id: UserId) -> Result<Vec<Permission>> {
        self.resolver().effective_permission_set(user_id)
    }

    pub fn has_role(&self, user_id: UserId, role_id: RoleId) -> Result<bool> {
        self.resolver().has_role(user_id, role_id)
    }

    pub fn has_any_role<N: AsRef<str>>(&self, user_id: UserId, names: &[N]) -> Result<bool> {
        self.resolver().has_any_role(user_id, names)
    }

    /// Positional: the user's roles in assignment order must equal `names`
    pub fn has_all_roles<N: AsRef<str>>(&self, user_id: UserId, names: &[N]) -> Result<bool> {
        self.resolver().has_all_roles(user_id, names)
    }

    pub fn has_all_roles_positional<N: AsRef<str>>(
        &self,
        user_id: UserId,
        names: &[N],
    ) -> Result<bool> {
        self.resolver().has_all_roles_positional(user_id, names)
    }

    pub fn has_all_roles_containing<N: AsRef<str>>(
        &self,
        user_id: UserId,
        names: &[N],
    ) -> Result<bool> {
        self.resolver().has_all_roles_containing(user_id, names)
    }

    pub fn has_any_permission<N: AsRef<str>>(&self, user_id: UserId, names: &[N]) -> Result<bool> {
        self.resolver().has_any_permission(user_id, names)
    }

    /// Positional, like [`AccessControl::has_all_roles`]
    pub fn has_all_permissions<N: AsRef<str>>(
        &self,
        user_id: UserId,
        names: &[N],
    ) -> Result<bool> {
        self.resolver().has_all_permissions(user_id, names)
    }

    pub fn has_all_permissions_positional<N: AsRef<str>>(
        &self,
        user_id: UserId,
        names: &[N],
    ) -> Result<bool> {
        self.resolver().has_all_permissions_positional(user_id, names)
    }

    pub fn has_all_permissions_containing<N: AsRef<str>>(
        &self,
        user_id: UserId,
        names: &[N],
    ) -> Result<bool> {
        self.resolver().has_all_permissions_containing(user_id, names)
    }

    pub fn has_permission_to(&self, role_id: RoleId, permission_name: &str) -> Result<Permission> {
        self.resolver().has_permission_to(role_id, permission_name)
    }

    // ========== User ↔ Role ==========

    pub fn assign_roles_to_user<N: AsRef<str>>(&self, user_id: UserId, names: &[N]) -> Result<bool> {
        self.assignments().assign_roles_to_user(user_id, names)
    }

    pub fn revoke_role_from_user(&self, user_id: UserId, role: impl Into<RoleRef>) -> Result<bool> {
        self.assignments().revoke_role_from_user(user_id, role)
    }

    pub fn revoke_all_roles_from_user(&self, user_id: UserId) -> Result<bool> {
        self.assignments().revoke_all_roles_from_user(user_id)
    }

    /// Replace the user's roles; the user must hold at least one role already
    pub fn sync_roles_for_user<N: AsRef<str>>(&self, user_id: UserId, names: &[N]) -> Result<bool> {
        self.assignments().sync_roles_for_user(user_id, names)
    }

    // ========== Role ↔ Permission ==========

    /// Additive: permissions already linked to the role are kept
    pub fn assign_permissions_to_role<N: AsRef<str>>(
        &self,
        role_id: RoleId,
        names: &[N],
    ) -> BatchResult<Permission> {
        self.assignments().assign_permissions_to_role(role_id, names)
    }

    /// Replace: the role ends up with exactly the named permissions
    pub fn sync_permissions_for_role<N: AsRef<str>>(
        &self,
        role_id: RoleId,
        names: &[N],
    ) -> BatchResult<Permission> {
        self.assignments().sync_permissions_for_role(role_id, names)
    }

    pub fn revoke_permission_from_role(
        &self,
        role_id: RoleId,
        permission: impl Into<PermissionRef>,
    ) -> Result<bool> {
        self.assignments()
            .revoke_permission_from_role(role_id, permission)
    }

    pub fn count_permissions_of_role(&self, role_id: RoleId) -> Result<usize> {
        self.assignments().count_permissions_of_role(role_id)
    }

    pub fn clear_permissions_of_role(&self, role_id: RoleId) -> Result<bool> {
        self.assignments().clear_permissions_of_role(role_id)
    }

    pub fn revoke_role_from_permission(
        &self,
        permission_id: PermissionId,
        role: impl Into<RoleRef>,
    ) -> Result<bool> {
        self.assignments()
            .revoke_role_from_permission(permission_id, role)
    }

    pub fn count_roles_of_permission(&self, permission_id: PermissionId) -> Result<usize> {
        self.assignments().count_roles_of_permission(permission_id)
    }

    pub fn clear_roles_of_permission(&self, permission_id: PermissionId) -> Result<bool> {
        self.assignments().clear_roles_of_permission(permission_id)
    }

    pub fn sync_roles_for_permission<N: AsRef<str>>(
        &self,
        permission_id: PermissionId,
        names: &[N],
    ) -> BatchResult<Role> {
        self.assignments()
            .sync_roles_for_permission(permission_id, names)
    }
}
