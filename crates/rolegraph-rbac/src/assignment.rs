//! AssignmentManager - Mutations of the association rows
//!
//! Two symmetric relations, each a set of pairs:
//!
//! ```text
//! user ──< user_roles >── role ──< role_permissions >── permission
//! ```
//!
//! - assign: absent → present, present → present (no-op, not an error)
//! - revoke: present → absent; absent → `NothingToDelete`
//! - clear:  every pair of one side → absent
//! - sync:   replace every pair of one side with a resolved target set
//!
//! Names are always resolved before anything is written. A batch that hits
//! an unknown name fails without touching the store.
//!
//! The two sync operations differ on purpose: `sync_roles_for_user` refuses
//! to run for a user without any role, while the role ↔ permission syncs
//! accept an empty prior set.

use rolegraph_domain::{
    BatchResult, EntityStore, PartialResolution, Permission, PermissionId, PermissionRef,
    RbacError, Result, Role, RoleId, RoleRef, UserId,
};
use tracing::{debug, info, warn};

use crate::resolver::Resolver;

/// Assign / revoke / sync operations over an Entity Store
#[derive(Debug)]
pub struct AssignmentManager<'a, S: ?Sized> {
    store: &'a S,
    resolver: Resolver<'a, S>,
}

impl<'a, S: EntityStore + ?Sized> AssignmentManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            resolver: Resolver::new(store),
        }
    }

    // ========== User ↔ Role ==========

    /// Give the user every named role. Already-held roles are skipped.
    pub fn assign_roles_to_user<N: AsRef<str>>(&self, user_id: UserId, names: &[N]) -> Result<bool> {
        let roles = self
            .resolver
            .roles_named(names)
            .map_err(PartialResolution::into_error)?;

        for role in &roles {
            if self.store.insert_user_role(user_id, role.id)? {
                info!(user_id = %user_id, role = %role.name, "assigned role to user");
            } else {
                debug!(user_id = %user_id, role = %role.name, "user already holds role");
            }
        }
        Ok(true)
    }

    /// Remove a single role, addressed by id or name, from the user
    pub fn revoke_role_from_user(&self, user_id: UserId, role: impl Into<RoleRef>) -> Result<bool> {
        let role = self.resolver.role(&role.into())?;
        if self.store.delete_user_role(user_id, role.id)? == 0 {
            warn!(user_id = %user_id, role = %role.name, "revoke skipped, user does not hold role");
            return Err(RbacError::NothingToDelete(format!(
                "role '{}' of user {}",
                role.name, user_id
            )));
        }
        info!(user_id = %user_id, role = %role.name, "revoked role from user");
        Ok(true)
    }

    pub fn revoke_all_roles_from_user(&self, user_id: UserId) -> Result<bool> {
        let removed = self.store.delete_user_roles(user_id)?;
        if removed == 0 {
            warn!(user_id = %user_id, "revoke-all skipped, user holds no roles");
            return Err(RbacError::NothingToDelete(format!("roles of user {}", user_id)));
        }
        info!(user_id = %user_id, removed, "revoked all roles from user");
        Ok(true)
    }

    /// Replace the user's roles with the named ones.
    ///
    /// The user must already hold at least one role; otherwise this fails
    /// with `NothingToDelete` and nothing is written.
    pub fn sync_roles_for_user<N: AsRef<str>>(&self, user_id: UserId, names: &[N]) -> Result<bool> {
        if self.store.role_ids_of_user(user_id)?.is_empty() {
            warn!(user_id = %user_id, "sync skipped, user holds no roles");
            return Err(RbacError::NothingToDelete(format!("roles of user {}", user_id)));
        }

        let roles = self
            .resolver
            .roles_named(names)
            .map_err(PartialResolution::into_error)?;
        let role_ids: Vec<RoleId> = roles.iter().map(|r| r.id).collect();

        let removed = self.store.replace_user_roles(user_id, &role_ids)?;
        if removed == 0 {
            // another caller cleared the user between the check and the write
            warn!(user_id = %user_id, "sync replaced an empty role set");
            return Err(RbacError::NothingToDelete(format!("roles of user {}", user_id)));
        }
        info!(user_id = %user_id, removed, assigned = role_ids.len(), "synced user roles");
        Ok(true)
    }

    // ========== Role ↔ Permission ==========

    /// Link the named permissions to the role, keeping the ones it already has.
    ///
    /// Returns the resolved permissions.
    pub fn assign_permissions_to_role<N: AsRef<str>>(
        &self,
        role_id: RoleId,
        names: &[N],
    ) -> BatchResult<Permission> {
        let role = self.resolver.role_by_id(role_id)?;
        let permissions = self.resolver.permissions_named(names)?;
        let ids: Vec<PermissionId> = permissions.iter().map(|p| p.id).collect();

        self.store.append_permissions_to_role(role.id, &ids)?;
        info!(role = %role.name, permissions = ids.len(), "assigned permissions to role");
        Ok(permissions)
    }

    /// Make the named permissions the role's complete permission set.
    ///
    /// A role without permissions is fine. Returns the resolved permissions.
    pub fn sync_permissions_for_role<N: AsRef<str>>(
        &self,
        role_id: RoleId,
        names: &[N],
    ) -> BatchResult<Permission> {
        let role = self.resolver.role_by_id(role_id)?;
        let permissions = self.resolver.permissions_named(names)?;
        let ids: Vec<PermissionId> = permissions.iter().map(|p| p.id).collect();

        self.store.replace_permissions_of_role(role.id, &ids)?;
        info!(role = %role.name, permissions = ids.len(), "synced role permissions");
        Ok(permissions)
    }

    /// Unlink a single permission, addressed by id or name, from the role
    pub fn revoke_permission_from_role(
        &self,
        role_id: RoleId,
        permission: impl Into<PermissionRef>,
    ) -> Result<bool> {
        let role = self.resolver.role_by_id(role_id)?;
        let permission = self.resolver.permission(&permission.into())?;

        if self.store.delete_role_permission(role.id, permission.id)? == 0 {
            warn!(role = %role.name, permission = %permission.name, "revoke skipped, permission not linked");
            return Err(RbacError::NothingToDelete(format!(
                "permission '{}' of role '{}'",
                permission.name, role.name
            )));
        }
        info!(role = %role.name, permission = %permission.name, "revoked permission from role");
        Ok(true)
    }

    pub fn count_permissions_of_role(&self, role_id: RoleId) -> Result<usize> {
        self.resolver.role_by_id(role_id)?;
        Ok(self.store.count_permissions_of_role(role_id)?)
    }

    /// Unlink every permission from the role. Succeeds on an empty set too.
    pub fn clear_permissions_of_role(&self, role_id: RoleId) -> Result<bool> {
        let role = self.resolver.role_by_id(role_id)?;
        let removed = self.store.clear_permissions_of_role(role.id)?;
        info!(role = %role.name, removed, "cleared role permissions");
        Ok(true)
    }

    // ========== Permission ↔ Role (permission side) ==========

    /// Unlink a single role, addressed by id or name, from the permission
    pub fn revoke_role_from_permission(
        &self,
        permission_id: PermissionId,
        role: impl Into<RoleRef>,
    ) -> Result<bool> {
        let permission = self.resolver.permission_by_id(permission_id)?;
        let role = self.resolver.role(&role.into())?;

        if self.store.delete_role_permission(role.id, permission.id)? == 0 {
            warn!(role = %role.name, permission = %permission.name, "revoke skipped, role not linked");
            return Err(RbacError::NothingToDelete(format!(
                "role '{}' of permission '{}'",
                role.name, permission.name
            )));
        }
        info!(role = %role.name, permission = %permission.name, "revoked role from permission");
        Ok(true)
    }

    pub fn count_roles_of_permission(&self, permission_id: PermissionId) -> Result<usize> {
        self.resolver.permission_by_id(permission_id)?;
        Ok(self.store.count_roles_of_permission(permission_id)?)
    }

    pub fn clear_roles_of_permission(&self, permission_id: PermissionId) -> Result<bool> {
        let permission = self.resolver.permission_by_id(permission_id)?;
        let removed = self.store.clear_roles_of_permission(permission.id)?;
        info!(permission = %permission.name, removed, "cleared permission roles");
        Ok(true)
    }

    /// Make the named roles the permission's complete role set
    pub fn sync_roles_for_permission<N: AsRef<str>>(
        &self,
        permission_id: PermissionId,
        names: &[N],
    ) -> BatchResult<Role> {
        let permission = self.resolver.permission_by_id(permission_id)?;
        let roles = self.resolver.roles_named(names)?;
        let ids: Vec<RoleId> = roles.iter().map(|r| r.id).collect();

        self.store.replace_roles_of_permission(permission.id, &ids)?;
        info!(permission = %permission.name, roles = ids.len(), "synced permission roles");
        Ok(roles)
    }
}
