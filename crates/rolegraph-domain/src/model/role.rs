//! Role - A named bundle of permissions that can be handed to users
//!
//! The name is the natural key used by every by-name operation. Uniqueness of
//! names is a storage concern; the core assumes it but does not enforce it.

use serde::{Deserialize, Serialize};

use super::ids::RoleId;

/// A stored role
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Role {
    pub fn new(id: RoleId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Whether this role was created from `template` (full equality of name and description)
    pub fn matches(&self, template: &NewRole) -> bool {
        self.name == template.name && self.description == template.description
    }
}

/// Role fields without identity
///
/// Used as the find-or-create template and as the field set for updates.
/// On update, empty fields leave the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRole {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl NewRole {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Overwrite the non-empty fields of `role`
    pub fn apply_to(&self, role: &mut Role) {
        if !self.name.is_empty() {
            role.name = self.name.clone();
        }
        if !self.description.is_empty() {
            role.description = self.description.clone();
        }
    }

    /// True when applying this template would change nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.description.is_empty()
    }
}

/// A role addressed either by primary key or by name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleRef {
    Id(RoleId),
    Name(String),
}

impl From<RoleId> for RoleRef {
    fn from(id: RoleId) -> Self {
        RoleRef::Id(id)
    }
}

impl From<&str> for RoleRef {
    fn from(name: &str) -> Self {
        RoleRef::Name(name.to_string())
    }
}

impl From<String> for RoleRef {
    fn from(name: String) -> Self {
        RoleRef::Name(name)
    }
}

impl core::fmt::Display for RoleRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RoleRef::Id(id) => write!(f, "#{}", id),
            RoleRef::Name(name) => write!(f, "'{}'", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_requires_both_fields() {
        let role = Role::new(RoleId::new(1), "editor", "Edits content");
        assert!(role.matches(&NewRole::new("editor", "Edits content")));
        assert!(!role.matches(&NewRole::new("editor", "")));
    }

    #[test]
    fn test_apply_skips_empty_fields() {
        let mut role = Role::new(RoleId::new(1), "editor", "Edits content");
        NewRole::new("", "Edits everything").apply_to(&mut role);
        assert_eq!(role.name, "editor");
        assert_eq!(role.description, "Edits everything");
    }

    #[test]
    fn test_role_ref_display() {
        assert_eq!(RoleRef::from(RoleId::new(3)).to_string(), "#3");
        assert_eq!(RoleRef::from("admin").to_string(), "'admin'");
    }
}
