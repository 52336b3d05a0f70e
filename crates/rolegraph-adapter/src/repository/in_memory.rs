//! In-Memory Entity Store
//!
//! A single-process implementation of every domain port. Useful for testing,
//! development and seed-and-query tooling.
//!
//! All tables live behind one `RwLock`, so every trait call is atomic.
//! Foreign keys behave like a relational schema: link rows must point at
//! existing entities, deleting a role cascades to its permission links, and
//! deleting a role still held by a user or a permission still linked to a
//! role is rejected. Role and permission names are unique.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rolegraph_domain::model::ids::{PermissionId, RoleId, UserId};
use rolegraph_domain::model::permission::{NewPermission, Permission};
use rolegraph_domain::model::role::{NewRole, Role};
use rolegraph_domain::repository::{
    PermissionRepository, RolePermissionRepository, RoleRepository, StoreError,
    UserRoleRepository,
};

#[derive(Debug, Default)]
struct Tables {
    roles: BTreeMap<RoleId, Role>,
    permissions: BTreeMap<PermissionId, Permission>,
    /// Insertion-ordered link rows
    role_permissions: Vec<(RoleId, PermissionId)>,
    user_roles: Vec<(UserId, RoleId)>,
    last_role_id: u64,
    last_permission_id: u64,
}

impl Tables {
    fn require_role(&self, id: RoleId) -> Result<(), StoreError> {
        if self.roles.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::Constraint(format!(
                "role #{} does not exist",
                id
            )))
        }
    }

    fn require_permission(&self, id: PermissionId) -> Result<(), StoreError> {
        if self.permissions.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::Constraint(format!(
                "permission #{} does not exist",
                id
            )))
        }
    }

    /// `UNIQUE(name)` on roles, ignoring the row being updated
    fn check_role_name(&self, name: &str, except: Option<RoleId>) -> Result<(), StoreError> {
        match self.roles.values().find(|r| r.name == name) {
            Some(existing) if Some(existing.id) != except => Err(StoreError::Constraint(format!(
                "role name '{}' is taken by role #{}",
                name, existing.id
            ))),
            _ => Ok(()),
        }
    }

    fn check_permission_name(
        &self,
        name: &str,
        except: Option<PermissionId>,
    ) -> Result<(), StoreError> {
        match self.permissions.values().find(|p| p.name == name) {
            Some(existing) if Some(existing.id) != except => Err(StoreError::Constraint(format!(
                "permission name '{}' is taken by permission #{}",
                name, existing.id
            ))),
            _ => Ok(()),
        }
    }

    fn link(&mut self, role_id: RoleId, permission_id: PermissionId) {
        if !self.role_permissions.contains(&(role_id, permission_id)) {
            self.role_permissions.push((role_id, permission_id));
        }
    }

    fn unlink_where(&mut self, keep: impl Fn(&(RoleId, PermissionId)) -> bool) -> usize {
        let before = self.role_permissions.len();
        self.role_permissions.retain(keep);
        before - self.role_permissions.len()
    }

    fn unassign_where(&mut self, keep: impl Fn(&(UserId, RoleId)) -> bool) -> usize {
        let before = self.user_roles.len();
        self.user_roles.retain(keep);
        before - self.user_roles.len()
    }
}

/// In-memory Entity Store
///
/// Thread-safe implementation using RwLock. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("Failed to acquire read lock".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("Failed to acquire write lock".to_string()))
    }

    /// Number of role ↔ permission link rows
    pub fn role_permission_rows(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.role_permissions.len())
    }

    /// Number of user ↔ role rows
    pub fn user_role_rows(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.user_roles.len())
    }
}

impl RoleRepository for InMemoryStore {
    fn get_role(&self, id: RoleId) -> Result<Option<Role>, StoreError> {
        Ok(self.read()?.roles.get(&id).cloned())
    }

    fn get_role_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        let tables = self.read()?;
        Ok(tables.roles.values().find(|r| r.name == name).cloned())
    }

    fn find_or_create_role(&self, template: &NewRole) -> Result<(Role, bool), StoreError> {
        let mut tables = self.write()?;
        if let Some(role) = tables.roles.values().find(|r| r.matches(template)) {
            return Ok((role.clone(), false));
        }
        tables.check_role_name(&template.name, None)?;

        tables.last_role_id += 1;
        let role = Role::new(
            RoleId::new(tables.last_role_id),
            template.name.clone(),
            template.description.clone(),
        );
        tables.roles.insert(role.id, role.clone());
        tracing::trace!(role_id = %role.id, name = %role.name, "inserted role row");
        Ok((role, true))
    }

    fn update_role(&self, id: RoleId, fields: &NewRole) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        if !fields.name.is_empty() {
            tables.check_role_name(&fields.name, Some(id))?;
        }
        match tables.roles.get_mut(&id) {
            Some(role) if !fields.is_empty() => {
                fields.apply_to(role);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    fn delete_role(&self, id: RoleId) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        if tables.user_roles.iter().any(|(_, role_id)| *role_id == id) {
            return Err(StoreError::Constraint(format!(
                "role #{} is referenced by user_roles",
                id
            )));
        }
        if tables.roles.remove(&id).is_none() {
            return Ok(0);
        }
        let cascaded = tables.unlink_where(|(role_id, _)| *role_id != id);
        tracing::trace!(role_id = %id, cascaded, "deleted role row");
        Ok(1)
    }

    fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        Ok(self.read()?.roles.values().cloned().collect())
    }
}

impl PermissionRepository for InMemoryStore {
    fn get_permission(&self, id: PermissionId) -> Result<Option<Permission>, StoreError> {
        Ok(self.read()?.permissions.get(&id).cloned())
    }

    fn get_permission_by_name(&self, name: &str) -> Result<Option<Permission>, StoreError> {
        let tables = self.read()?;
        Ok(tables.permissions.values().find(|p| p.name == name).cloned())
    }

    fn find_or_create_permission(
        &self,
        template: &NewPermission,
    ) -> Result<(Permission, bool), StoreError> {
        let mut tables = self.write()?;
        if let Some(permission) = tables.permissions.values().find(|p| p.matches(template)) {
            return Ok((permission.clone(), false));
        }
        tables.check_permission_name(&template.name, None)?;

        tables.last_permission_id += 1;
        let permission = Permission::new(
            PermissionId::new(tables.last_permission_id),
            template.name.clone(),
            template.description.clone(),
        );
        tables.permissions.insert(permission.id, permission.clone());
        tracing::trace!(permission_id = %permission.id, name = %permission.name, "inserted permission row");
        Ok((permission, true))
    }

    fn update_permission(
        &self,
        id: PermissionId,
        fields: &NewPermission,
    ) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        if !fields.name.is_empty() {
            tables.check_permission_name(&fields.name, Some(id))?;
        }
        match tables.permissions.get_mut(&id) {
            Some(permission) if !fields.is_empty() => {
                fields.apply_to(permission);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    fn delete_permission(&self, id: PermissionId) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        if tables.role_permissions.iter().any(|(_, p)| *p == id) {
            return Err(StoreError::Constraint(format!(
                "permission #{} is referenced by role_permissions",
                id
            )));
        }
        Ok(usize::from(tables.permissions.remove(&id).is_some()))
    }

    fn list_permissions(&self) -> Result<Vec<Permission>, StoreError> {
        Ok(self.read()?.permissions.values().cloned().collect())
    }
}

impl RolePermissionRepository for InMemoryStore {
    fn permissions_of_role(&self, role_id: RoleId) -> Result<Vec<Permission>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .role_permissions
            .iter()
            .filter(|(r, _)| *r == role_id)
            .filter_map(|(_, p)| tables.permissions.get(p).cloned())
            .collect())
    }

    fn roles_of_permission(&self, permission_id: PermissionId) -> Result<Vec<Role>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .role_permissions
            .iter()
            .filter(|(_, p)| *p == permission_id)
            .filter_map(|(r, _)| tables.roles.get(r).cloned())
            .collect())
    }

    fn count_permissions_of_role(&self, role_id: RoleId) -> Result<usize, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .role_permissions
            .iter()
            .filter(|(r, _)| *r == role_id)
            .count())
    }

    fn count_roles_of_permission(&self, permission_id: PermissionId) -> Result<usize, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .role_permissions
            .iter()
            .filter(|(_, p)| *p == permission_id)
            .count())
    }

    fn append_permissions_to_role(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.require_role(role_id)?;
        for id in permission_ids {
            tables.require_permission(*id)?;
        }
        for id in permission_ids {
            tables.link(role_id, *id);
        }
        Ok(())
    }

    fn replace_permissions_of_role(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.require_role(role_id)?;
        for id in permission_ids {
            tables.require_permission(*id)?;
        }
        tables.unlink_where(|(r, _)| *r != role_id);
        for id in permission_ids {
            tables.link(role_id, *id);
        }
        Ok(())
    }

    fn clear_permissions_of_role(&self, role_id: RoleId) -> Result<usize, StoreError> {
        Ok(self.write()?.unlink_where(|(r, _)| *r != role_id))
    }

    fn replace_roles_of_permission(
        &self,
        permission_id: PermissionId,
        role_ids: &[RoleId],
    ) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.require_permission(permission_id)?;
        for id in role_ids {
            tables.require_role(*id)?;
        }
        tables.unlink_where(|(_, p)| *p != permission_id);
        for id in role_ids {
            tables.link(*id, permission_id);
        }
        Ok(())
    }

    fn clear_roles_of_permission(&self, permission_id: PermissionId) -> Result<usize, StoreError> {
        Ok(self.write()?.unlink_where(|(_, p)| *p != permission_id))
    }

    fn delete_role_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<usize, StoreError> {
        Ok(self
            .write()?
            .unlink_where(|pair| *pair != (role_id, permission_id)))
    }
}

impl UserRoleRepository for InMemoryStore {
    fn role_ids_of_user(&self, user_id: UserId) -> Result<Vec<RoleId>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .user_roles
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, r)| *r)
            .collect())
    }

    fn insert_user_role(&self, user_id: UserId, role_id: RoleId) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        tables.require_role(role_id)?;
        if tables.user_roles.contains(&(user_id, role_id)) {
            return Ok(false);
        }
        tables.user_roles.push((user_id, role_id));
        Ok(true)
    }

    fn delete_user_role(&self, user_id: UserId, role_id: RoleId) -> Result<usize, StoreError> {
        Ok(self
            .write()?
            .unassign_where(|pair| *pair != (user_id, role_id)))
    }

    fn delete_user_roles(&self, user_id: UserId) -> Result<usize, StoreError> {
        Ok(self.write()?.unassign_where(|(u, _)| *u != user_id))
    }

    fn replace_user_roles(
        &self,
        user_id: UserId,
        role_ids: &[RoleId],
    ) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        for id in role_ids {
            tables.require_role(*id)?;
        }
        let removed = tables.unassign_where(|(u, _)| *u != user_id);
        for id in role_ids {
            if !tables.user_roles.contains(&(user_id, *id)) {
                tables.user_roles.push((user_id, *id));
            }
        }
        Ok(removed)
    }

    fn count_users_with_role(&self, role_id: RoleId) -> Result<usize, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .user_roles
            .iter()
            .filter(|(_, r)| *r == role_id)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(store: &InMemoryStore, name: &str) -> Role {
        store
            .find_or_create_role(&NewRole::new(name, ""))
            .unwrap()
            .0
    }

    fn permission(store: &InMemoryStore, name: &str) -> Permission {
        store
            .find_or_create_permission(&NewPermission::new(name, ""))
            .unwrap()
            .0
    }

    #[test]
    fn test_find_or_create_is_idempotent() {
        let store = InMemoryStore::new();
        let (first, created) = store
            .find_or_create_permission(&NewPermission::new("p", "d"))
            .unwrap();
        assert!(created);

        let (second, created) = store
            .find_or_create_permission(&NewPermission::new("p", "d"))
            .unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(store.list_permissions().unwrap().len(), 1);
    }

    #[test]
    fn test_names_are_unique() {
        let store = InMemoryStore::new();
        store.find_or_create_role(&NewRole::new("editor", "v1")).unwrap();
        let err = store
            .find_or_create_role(&NewRole::new("editor", "v2"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(store.list_roles().unwrap().len(), 1);

        store
            .find_or_create_permission(&NewPermission::new("read", "v1"))
            .unwrap();
        assert!(matches!(
            store.find_or_create_permission(&NewPermission::new("read", "v2")),
            Err(StoreError::Constraint(_))
        ));
        assert_eq!(store.list_permissions().unwrap().len(), 1);
    }

    #[test]
    fn test_update_rejects_rename_collision() {
        let store = InMemoryStore::new();
        let editor = role(&store, "editor");
        role(&store, "viewer");
        let err = store
            .update_role(editor.id, &NewRole::new("viewer", ""))
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(store.get_role(editor.id).unwrap().unwrap().name, "editor");

        // keeping its own name is not a collision
        assert_eq!(
            store
                .update_role(editor.id, &NewRole::new("editor", "Edits"))
                .unwrap(),
            1
        );

        let read = permission(&store, "read");
        permission(&store, "write");
        assert!(matches!(
            store.update_permission(read.id, &NewPermission::new("write", "")),
            Err(StoreError::Constraint(_))
        ));
    }

    #[test]
    fn test_ids_are_sequential() {
        let store = InMemoryStore::new();
        assert_eq!(role(&store, "a").id, RoleId::new(1));
        assert_eq!(role(&store, "b").id, RoleId::new(2));
        assert_eq!(permission(&store, "p").id, PermissionId::new(1));
    }

    #[test]
    fn test_update_reports_rows() {
        let store = InMemoryStore::new();
        let r = role(&store, "editor");

        assert_eq!(
            store
                .update_role(r.id, &NewRole::new("", "Edits content"))
                .unwrap(),
            1
        );
        let updated = store.get_role(r.id).unwrap().unwrap();
        assert_eq!(updated.name, "editor");
        assert_eq!(updated.description, "Edits content");

        assert_eq!(
            store
                .update_role(RoleId::new(99), &NewRole::new("x", ""))
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_append_keeps_existing_links_and_skips_duplicates() {
        let store = InMemoryStore::new();
        let r = role(&store, "editor");
        let a = permission(&store, "a");
        let b = permission(&store, "b");

        store.append_permissions_to_role(r.id, &[a.id]).unwrap();
        store.append_permissions_to_role(r.id, &[a.id, b.id]).unwrap();

        let names: Vec<_> = store
            .permissions_of_role(r.id)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(store.role_permission_rows().unwrap(), 2);
    }

    #[test]
    fn test_replace_only_touches_one_role() {
        let store = InMemoryStore::new();
        let editor = role(&store, "editor");
        let admin = role(&store, "admin");
        let a = permission(&store, "a");
        let b = permission(&store, "b");

        store.append_permissions_to_role(editor.id, &[a.id]).unwrap();
        store.append_permissions_to_role(admin.id, &[a.id]).unwrap();
        store.replace_permissions_of_role(editor.id, &[b.id]).unwrap();

        assert_eq!(store.permissions_of_role(editor.id).unwrap(), vec![b]);
        assert_eq!(store.permissions_of_role(admin.id).unwrap(), vec![a]);
    }

    #[test]
    fn test_links_require_existing_rows() {
        let store = InMemoryStore::new();
        let r = role(&store, "editor");
        let p = permission(&store, "p");

        let err = store
            .append_permissions_to_role(r.id, &[p.id, PermissionId::new(42)])
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(store.count_permissions_of_role(r.id).unwrap(), 0);

        assert!(store
            .insert_user_role(UserId::new(1), RoleId::new(42))
            .is_err());
    }

    #[test]
    fn test_delete_role_cascades_permission_links() {
        let store = InMemoryStore::new();
        let r = role(&store, "editor");
        let p = permission(&store, "p");
        store.append_permissions_to_role(r.id, &[p.id]).unwrap();

        assert_eq!(store.delete_role(r.id).unwrap(), 1);
        assert_eq!(store.count_roles_of_permission(p.id).unwrap(), 0);
        assert_eq!(store.delete_role(r.id).unwrap(), 0);
    }

    #[test]
    fn test_delete_rejects_referenced_rows() {
        let store = InMemoryStore::new();
        let r = role(&store, "editor");
        let p = permission(&store, "p");
        store.append_permissions_to_role(r.id, &[p.id]).unwrap();
        store.insert_user_role(UserId::new(7), r.id).unwrap();

        assert!(matches!(
            store.delete_role(r.id),
            Err(StoreError::Constraint(_))
        ));
        assert!(matches!(
            store.delete_permission(p.id),
            Err(StoreError::Constraint(_))
        ));
    }

    #[test]
    fn test_user_roles_keep_assignment_order() {
        let store = InMemoryStore::new();
        let x = role(&store, "x");
        let y = role(&store, "y");
        let user = UserId::new(42);

        assert!(store.insert_user_role(user, y.id).unwrap());
        assert!(store.insert_user_role(user, x.id).unwrap());
        assert!(!store.insert_user_role(user, y.id).unwrap());

        assert_eq!(store.role_ids_of_user(user).unwrap(), vec![y.id, x.id]);
        assert_eq!(store.count_users_with_role(y.id).unwrap(), 1);
    }

    #[test]
    fn test_replace_user_roles_reports_removed_rows() {
        let store = InMemoryStore::new();
        let x = role(&store, "x");
        let y = role(&store, "y");
        let user = UserId::new(1);
        let other = UserId::new(2);

        store.insert_user_role(user, x.id).unwrap();
        store.insert_user_role(other, x.id).unwrap();

        assert_eq!(store.replace_user_roles(user, &[y.id, y.id]).unwrap(), 1);
        assert_eq!(store.role_ids_of_user(user).unwrap(), vec![y.id]);
        assert_eq!(store.role_ids_of_user(other).unwrap(), vec![x.id]);
    }

    #[test]
    fn test_clones_share_tables() {
        let store = InMemoryStore::new();
        let handle = store.clone();
        role(&store, "shared");
        assert!(handle.get_role_by_name("shared").unwrap().is_some());
    }
}
