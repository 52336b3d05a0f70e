//! Facade behavior when the store misbehaves: dangling user role rows and
//! backend failures.

use std::sync::atomic::{AtomicBool, Ordering};

use rolegraph_adapter::InMemoryStore;
use rolegraph_domain::{
    PermissionRepository, RolePermissionRepository, RoleRepository, StoreError,
    UserRoleRepository,
};
use rolegraph_rbac::{
    AccessControl, ErrorKind, NewPermission, NewRole, Permission, PermissionId, RbacError, Role,
    RoleId, UserId,
};

/// Wraps an `InMemoryStore`, hiding one role row and optionally failing
/// every user role lookup.
struct FlakyStore {
    inner: InMemoryStore,
    hidden_role: Option<RoleId>,
    offline: AtomicBool,
}

impl RoleRepository for FlakyStore {
    fn get_role(&self, id: RoleId) -> Result<Option<Role>, StoreError> {
        if Some(id) == self.hidden_role {
            return Ok(None);
        }
        self.inner.get_role(id)
    }

    fn get_role_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        self.inner.get_role_by_name(name)
    }

    fn find_or_create_role(&self, template: &NewRole) -> Result<(Role, bool), StoreError> {
        self.inner.find_or_create_role(template)
    }

    fn update_role(&self, id: RoleId, fields: &NewRole) -> Result<usize, StoreError> {
        self.inner.update_role(id, fields)
    }

    fn delete_role(&self, id: RoleId) -> Result<usize, StoreError> {
        self.inner.delete_role(id)
    }

    fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        self.inner.list_roles()
    }
}

impl PermissionRepository for FlakyStore {
    fn get_permission(&self, id: PermissionId) -> Result<Option<Permission>, StoreError> {
        self.inner.get_permission(id)
    }

    fn get_permission_by_name(&self, name: &str) -> Result<Option<Permission>, StoreError> {
        self.inner.get_permission_by_name(name)
    }

    fn find_or_create_permission(
        &self,
        template: &NewPermission,
    ) -> Result<(Permission, bool), StoreError> {
        self.inner.find_or_create_permission(template)
    }

    fn update_permission(
        &self,
        id: PermissionId,
        fields: &NewPermission,
    ) -> Result<usize, StoreError> {
        self.inner.update_permission(id, fields)
    }

    fn delete_permission(&self, id: PermissionId) -> Result<usize, StoreError> {
        self.inner.delete_permission(id)
    }

    fn list_permissions(&self) -> Result<Vec<Permission>, StoreError> {
        self.inner.list_permissions()
    }
}

impl RolePermissionRepository for FlakyStore {
    fn permissions_of_role(&self, role_id: RoleId) -> Result<Vec<Permission>, StoreError> {
        self.inner.permissions_of_role(role_id)
    }

    fn roles_of_permission(&self, permission_id: PermissionId) -> Result<Vec<Role>, StoreError> {
        self.inner.roles_of_permission(permission_id)
    }

    fn count_permissions_of_role(&self, role_id: RoleId) -> Result<usize, StoreError> {
        self.inner.count_permissions_of_role(role_id)
    }

    fn count_roles_of_permission(&self, permission_id: PermissionId) -> Result<usize, StoreError> {
        self.inner.count_roles_of_permission(permission_id)
    }

    fn append_permissions_to_role(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> Result<(), StoreError> {
        self.inner.append_permissions_to_role(role_id, permission_ids)
    }

    fn replace_permissions_of_role(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> Result<(), StoreError> {
        self.inner.replace_permissions_of_role(role_id, permission_ids)
    }

    fn clear_permissions_of_role(&self, role_id: RoleId) -> Result<usize, StoreError> {
        self.inner.clear_permissions_of_role(role_id)
    }

    fn replace_roles_of_permission(
        &self,
        permission_id: PermissionId,
        role_ids: &[RoleId],
    ) -> Result<(), StoreError> {
        self.inner.replace_roles_of_permission(permission_id, role_ids)
    }

    fn clear_roles_of_permission(&self, permission_id: PermissionId) -> Result<usize, StoreError> {
        self.inner.clear_roles_of_permission(permission_id)
    }

    fn delete_role_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<usize, StoreError> {
        self.inner.delete_role_permission(role_id, permission_id)
    }
}

impl UserRoleRepository for FlakyStore {
    fn role_ids_of_user(&self, user_id: UserId) -> Result<Vec<RoleId>, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.role_ids_of_user(user_id)
    }

    fn insert_user_role(&self, user_id: UserId, role_id: RoleId) -> Result<bool, StoreError> {
        self.inner.insert_user_role(user_id, role_id)
    }

    fn delete_user_role(&self, user_id: UserId, role_id: RoleId) -> Result<usize, StoreError> {
        self.inner.delete_user_role(user_id, role_id)
    }

    fn delete_user_roles(&self, user_id: UserId) -> Result<usize, StoreError> {
        self.inner.delete_user_roles(user_id)
    }

    fn replace_user_roles(
        &self,
        user_id: UserId,
        role_ids: &[RoleId],
    ) -> Result<usize, StoreError> {
        self.inner.replace_user_roles(user_id, role_ids)
    }

    fn count_users_with_role(&self, role_id: RoleId) -> Result<usize, StoreError> {
        self.inner.count_users_with_role(role_id)
    }
}

const USER: UserId = UserId::new(1);

/// editor (#1) and viewer (#2) both held by USER, with viewer's row hidden
fn flaky_store() -> FlakyStore {
    let inner = InMemoryStore::new();
    {
        let acl = AccessControl::new(inner.clone());
        acl.find_or_create_permission(&NewPermission::new("read", ""))
            .unwrap();
        for name in ["editor", "viewer"] {
            let role = acl.find_or_create_role(&NewRole::new(name, "")).unwrap();
            acl.assign_permissions_to_role(role.id, &["read"]).unwrap();
        }
        acl.assign_roles_to_user(USER, &["editor", "viewer"]).unwrap();
    }
    FlakyStore {
        inner,
        hidden_role: Some(RoleId::new(2)),
        offline: AtomicBool::new(false),
    }
}

fn assert_dangling(err: RbacError) {
    assert!(matches!(
        err,
        RbacError::DanglingRole { user_id, role_id }
            if user_id == USER && role_id == RoleId::new(2)
    ));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_missing_role_row_is_dangling() {
    let acl = AccessControl::new(flaky_store());

    assert_dangling(acl.effective_roles(USER).unwrap_err());
    assert_dangling(acl.effective_permissions(USER).unwrap_err());
    assert_dangling(acl.has_any_role(USER, &["editor"]).unwrap_err());
    assert_dangling(acl.has_any_permission(USER, &["read"]).unwrap_err());
}

#[test]
fn test_store_failure_surfaces_as_underlying() {
    let store = flaky_store();
    store.offline.store(true, Ordering::SeqCst);
    let acl = AccessControl::new(store);

    let err = acl.effective_roles(USER).unwrap_err();
    assert!(matches!(err, RbacError::Store(StoreError::Unavailable(_))));
    assert_eq!(err.kind(), ErrorKind::Underlying);

    assert_eq!(
        acl.has_any_permission(USER, &["read"]).unwrap_err().kind(),
        ErrorKind::Underlying
    );
    assert_eq!(
        acl.sync_roles_for_user(USER, &["editor"]).unwrap_err().kind(),
        ErrorKind::Underlying
    );
}

#[test]
fn test_constraint_failure_surfaces_through_facade() {
    let acl = AccessControl::new(flaky_store());

    let err = acl
        .find_or_create_role(&NewRole::new("editor", "renamed"))
        .unwrap_err();
    assert!(matches!(err, RbacError::Store(StoreError::Constraint(_))));
    assert_eq!(err.kind(), ErrorKind::Underlying);
}
