//! Resolver - Read-only traversal of the role / permission graph
//!
//! Everything here answers questions; nothing writes. Lists come back in
//! store order (assignment order for user roles, link order for permissions)
//! and are concatenated without deduplication unless a method says otherwise.

use std::collections::HashSet;

use rolegraph_domain::{
    BatchResult, EntityStore, PartialResolution, Permission, PermissionId, PermissionRef,
    RbacError, Result, Role, RoleId, RoleRef, UserId,
};
use tracing::{debug, warn};

/// Names of the given roles, in order
pub fn role_names(roles: &[Role]) -> Vec<String> {
    roles.iter().map(|r| r.name.clone()).collect()
}

/// Read-only queries over an Entity Store
#[derive(Debug)]
pub struct Resolver<'a, S: ?Sized> {
    store: &'a S,
}

impl<S: ?Sized> Clone for Resolver<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for Resolver<'_, S> {}

impl<'a, S: EntityStore + ?Sized> Resolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    // ========== Single lookups ==========

    pub fn role_by_id(&self, id: RoleId) -> Result<Role> {
        self.store
            .get_role(id)?
            .ok_or(RbacError::RoleNotFound(RoleRef::Id(id)))
    }

    pub fn role_by_name(&self, name: &str) -> Result<Role> {
        self.store
            .get_role_by_name(name)?
            .ok_or_else(|| RbacError::RoleNotFound(RoleRef::from(name)))
    }

    /// Resolve a role addressed by id or name
    pub fn role(&self, role: &RoleRef) -> Result<Role> {
        match role {
            RoleRef::Id(id) => self.role_by_id(*id),
            RoleRef::Name(name) => self.role_by_name(name),
        }
    }

    pub fn permission_by_id(&self, id: PermissionId) -> Result<Permission> {
        self.store
            .get_permission(id)?
            .ok_or(RbacError::PermissionNotFound(PermissionRef::Id(id)))
    }

    pub fn permission_by_name(&self, name: &str) -> Result<Permission> {
        self.store
            .get_permission_by_name(name)?
            .ok_or_else(|| RbacError::PermissionNotFound(PermissionRef::from(name)))
    }

    pub fn permission(&self, permission: &PermissionRef) -> Result<Permission> {
        match permission {
            PermissionRef::Id(id) => self.permission_by_id(*id),
            PermissionRef::Name(name) => self.permission_by_name(name),
        }
    }

    // ========== Batch name resolution ==========

    /// Resolve every name to a role, stopping at the first unknown one.
    ///
    /// On failure the roles resolved so far travel with the error.
    pub fn roles_named<N: AsRef<str>>(&self, names: &[N]) -> BatchResult<Role> {
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            match self.role_by_name(name.as_ref()) {
                Ok(role) => resolved.push(role),
                Err(error) => return Err(PartialResolution::new(resolved, error)),
            }
        }
        Ok(resolved)
    }

    /// Resolve every name to a permission, stopping at the first unknown one
    pub fn permissions_named<N: AsRef<str>>(&self, names: &[N]) -> BatchResult<Permission> {
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            match self.permission_by_name(name.as_ref()) {
                Ok(permission) => resolved.push(permission),
                Err(error) => return Err(PartialResolution::new(resolved, error)),
            }
        }
        Ok(resolved)
    }

    // ========== Graph traversal ==========

    /// Roles linked to each named permission, concatenated.
    ///
    /// A role linked to two of the permissions appears twice.
    pub fn roles_for_permissions<N: AsRef<str>>(&self, names: &[N]) -> Result<Vec<Role>> {
        let mut roles = Vec::new();
        for name in names {
            let permission = self.permission_by_name(name.as_ref())?;
            roles.extend(self.store.roles_of_permission(permission.id)?);
        }
        debug!(permissions = names.len(), roles = roles.len(), "resolved roles for permissions");
        Ok(roles)
    }

    /// Permissions linked to each named role, concatenated
    pub fn permissions_for_roles<N: AsRef<str>>(&self, names: &[N]) -> Result<Vec<Permission>> {
        let mut permissions = Vec::new();
        for name in names {
            let role = self.role_by_name(name.as_ref())?;
            permissions.extend(self.store.permissions_of_role(role.id)?);
        }
        debug!(
            roles = names.len(),
            permissions = permissions.len(),
            "resolved permissions for roles"
        );
        Ok(permissions)
    }

    fn load_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> Result<Vec<Role>> {
        role_ids
            .iter()
            .map(|&role_id| -> Result<Role> {
                self.store.get_role(role_id)?.ok_or_else(|| {
                    warn!(user_id = %user_id, role_id = %role_id, "user role row points at a missing role");
                    RbacError::DanglingRole { user_id, role_id }
                })
            })
            .collect()
    }

    /// Roles held by the user, in assignment order.
    ///
    /// A user without any role row is reported as `UserHasNoRoles`.
    pub fn effective_roles(&self, user_id: UserId) -> Result<Vec<Role>> {
        let role_ids = self.store.role_ids_of_user(user_id)?;
        if role_ids.is_empty() {
            return Err(RbacError::UserHasNoRoles(user_id));
        }
        let roles = self.load_roles(user_id, &role_ids)?;
        debug!(user_id = %user_id, roles = roles.len(), "resolved effective roles");
        Ok(roles)
    }

    pub fn effective_role_names(&self, user_id: UserId) -> Result<Vec<String>> {
        Ok(role_names(&self.effective_roles(user_id)?))
    }

    /// Permissions reachable through the user's roles, concatenated per role.
    ///
    /// A user without roles has no permissions (an empty list, not an error).
    pub fn effective_permissions(&self, user_id: UserId) -> Result<Vec<Permission>> {
        let role_ids = self.store.role_ids_of_user(user_id)?;
        if role_ids.is_empty() {
            debug!(user_id = %user_id, "user has no roles, no permissions");
            return Ok(Vec::new());
        }
        let names = role_names(&self.load_roles(user_id, &role_ids)?);
        self.permissions_for_roles(&names)
    }

    /// Effective permissions with duplicates removed, first occurrence kept
    pub fn effective_permission_set(&self, user_id: UserId) -> Result<Vec<Permission>> {
        let mut seen = HashSet::new();
        Ok(self
            .effective_permissions(user_id)?
            .into_iter()
            .filter(|p| seen.insert(p.id))
            .collect())
    }

    // ========== Checks ==========

    /// Whether the user holds the role. The role itself must exist.
    pub fn has_role(&self, user_id: UserId, role_id: RoleId) -> Result<bool> {
        self.role_by_id(role_id)?;
        Ok(self.store.role_ids_of_user(user_id)?.contains(&role_id))
    }

    pub fn has_any_role<N: AsRef<str>>(&self, user_id: UserId, names: &[N]) -> Result<bool> {
        let roles = self.effective_roles(user_id)?;
        Ok(contains_any(roles.iter().map(|r| r.name.as_str()), names))
    }

    /// Positional check, see [`Resolver::has_all_roles_positional`]
    pub fn has_all_roles<N: AsRef<str>>(&self, user_id: UserId, names: &[N]) -> Result<bool> {
        self.has_all_roles_positional(user_id, names)
    }

    /// True when the user's roles, in assignment order, are exactly `names`.
    ///
    /// Stored role `i` is compared with `names[i]`. A mismatch returns
    /// `false`; running out of `names` before the stored roles are exhausted
    /// is a `PositionalOverrun`.
    pub fn has_all_roles_positional<N: AsRef<str>>(
        &self,
        user_id: UserId,
        names: &[N],
    ) -> Result<bool> {
        let roles = self.effective_roles(user_id)?;
        positional_match(roles.iter().map(|r| r.name.as_str()), names)
    }

    /// True when every name is among the user's roles, in any order
    pub fn has_all_roles_containing<N: AsRef<str>>(
        &self,
        user_id: UserId,
        names: &[N],
    ) -> Result<bool> {
        let roles = self.effective_roles(user_id)?;
        Ok(contains_all(roles.iter().map(|r| r.name.as_str()), names))
    }

    pub fn has_any_permission<N: AsRef<str>>(&self, user_id: UserId, names: &[N]) -> Result<bool> {
        let permissions = self.effective_permissions(user_id)?;
        Ok(contains_any(permissions.iter().map(|p| p.name.as_str()), names))
    }

    /// Positional check, see [`Resolver::has_all_permissions_positional`]
    pub fn has_all_permissions<N: AsRef<str>>(
        &self,
        user_id: UserId,
        names: &[N],
    ) -> Result<bool> {
        self.has_all_permissions_positional(user_id, names)
    }

    /// Same positional rule as [`Resolver::has_all_roles_positional`], applied
    /// to the concatenated effective permission list.
    pub fn has_all_permissions_positional<N: AsRef<str>>(
        &self,
        user_id: UserId,
        names: &[N],
    ) -> Result<bool> {
        let permissions = self.effective_permissions(user_id)?;
        positional_match(permissions.iter().map(|p| p.name.as_str()), names)
    }

    pub fn has_all_permissions_containing<N: AsRef<str>>(
        &self,
        user_id: UserId,
        names: &[N],
    ) -> Result<bool> {
        let permissions = self.effective_permissions(user_id)?;
        Ok(contains_all(
            permissions.iter().map(|p| p.name.as_str()),
            names,
        ))
    }

    /// The permission named `permission_name`, if the role is linked to it
    pub fn has_permission_to(&self, role_id: RoleId, permission_name: &str) -> Result<Permission> {
        let role = self.role_by_id(role_id)?;
        let wanted = self.permission_by_name(permission_name)?;
        self.store
            .permissions_of_role(role.id)?
            .into_iter()
            .find(|p| p.id == wanted.id)
            .ok_or_else(|| RbacError::PermissionNotGranted {
                role_id,
                permission: permission_name.to_string(),
            })
    }
}

fn positional_match<'s, N: AsRef<str>>(
    stored: impl ExactSizeIterator<Item = &'s str>,
    supplied: &[N],
) -> Result<bool> {
    let stored_len = stored.len();
    for (index, name) in stored.enumerate() {
        let Some(expected) = supplied.get(index) else {
            return Err(RbacError::PositionalOverrun {
                stored: stored_len,
                supplied: supplied.len(),
            });
        };
        if name != expected.as_ref() {
            return Ok(false);
        }
    }
    Ok(stored_len == supplied.len())
}

fn contains_any<'s, N: AsRef<str>>(stored: impl Iterator<Item = &'s str>, names: &[N]) -> bool {
    let stored: HashSet<&str> = stored.collect();
    names.iter().any(|n| stored.contains(n.as_ref()))
}

fn contains_all<'s, N: AsRef<str>>(stored: impl Iterator<Item = &'s str>, names: &[N]) -> bool {
    let stored: HashSet<&str> = stored.collect();
    names.iter().all(|n| stored.contains(n.as_ref()))
}
