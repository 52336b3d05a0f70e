//! Role Repository - Abstract persistence for roles

use crate::model::ids::RoleId;
use crate::model::role::{NewRole, Role};
use crate::repository::StoreError;

/// Role Repository Trait
pub trait RoleRepository: Send + Sync {
    /// Find a role by primary key
    fn get_role(&self, id: RoleId) -> Result<Option<Role>, StoreError>;

    /// Find the first role with the given name
    fn get_role_by_name(&self, name: &str) -> Result<Option<Role>, StoreError>;

    /// Return the role equal to `template`, inserting it if absent.
    ///
    /// The flag is `true` when a row was inserted.
    fn find_or_create_role(&self, template: &NewRole) -> Result<(Role, bool), StoreError>;

    /// Overwrite the non-empty fields of the role; returns rows affected
    fn update_role(&self, id: RoleId, fields: &NewRole) -> Result<usize, StoreError>;

    /// Remove the role and its permission links; returns rows affected
    fn delete_role(&self, id: RoleId) -> Result<usize, StoreError>;

    /// All roles, ordered by id
    fn list_roles(&self) -> Result<Vec<Role>, StoreError>;
}
