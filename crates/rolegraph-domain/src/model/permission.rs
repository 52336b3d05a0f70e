//! Permission - A named capability granted to roles

use serde::{Deserialize, Serialize};

use super::ids::PermissionId;

/// A stored permission
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Permission {
    pub fn new(id: PermissionId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn matches(&self, template: &NewPermission) -> bool {
        self.name == template.name && self.description == template.description
    }
}

/// Permission fields without identity (find-or-create template, update field set)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPermission {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl NewPermission {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Overwrite the non-empty fields of `permission`
    pub fn apply_to(&self, permission: &mut Permission) {
        if !self.name.is_empty() {
            permission.name = self.name.clone();
        }
        if !self.description.is_empty() {
            permission.description = self.description.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.description.is_empty()
    }
}

/// A permission addressed either by primary key or by name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionRef {
    Id(PermissionId),
    Name(String),
}

impl From<PermissionId> for PermissionRef {
    fn from(id: PermissionId) -> Self {
        PermissionRef::Id(id)
    }
}

impl From<&str> for PermissionRef {
    fn from(name: &str) -> Self {
        PermissionRef::Name(name.to_string())
    }
}

impl From<String> for PermissionRef {
    fn from(name: String) -> Self {
        PermissionRef::Name(name)
    }
}

impl core::fmt::Display for PermissionRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PermissionRef::Id(id) => write!(f, "#{}", id),
            PermissionRef::Name(name) => write!(f, "'{}'", name),
        }
    }
}
