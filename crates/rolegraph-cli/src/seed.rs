//! Seed files - Declarative bootstrap of the role / permission graph
//!
//! ```yaml
//! logLevel: debug
//! permissions:
//!   - name: manage-articles
//!     description: Create and edit articles
//! roles:
//!   - name: editor
//!     permissions: [manage-articles]
//! users:
//!   - id: 42
//!     roles: [editor]
//! ```
//!
//! Applying a seed is additive and idempotent: entities are found or
//! created, role permissions are appended and user roles assigned.

use std::path::{Path, PathBuf};

use rolegraph_domain::{
    EntityStore, NewPermission, NewRole, PartialResolution, RbacError, UserId, UserRoleRepository,
};
use rolegraph_rbac::AccessControl;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading or applying a seed file
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported seed format: {} (expected .yaml, .yml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("seed rejected: {0}")]
    Rbac(#[from] RbacError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSeed {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSeed {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Permission names, appended to whatever the role already has
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSeed {
    pub id: UserId,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Seed file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub permissions: Vec<PermissionSeed>,

    #[serde(default)]
    pub roles: Vec<RoleSeed>,

    #[serde(default)]
    pub users: Vec<UserSeed>,
}

/// What a seed run touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Permission entries found or created
    pub permissions: usize,
    /// Role entries found or created
    pub roles: usize,
    /// Role ↔ permission rows added by this run
    pub role_permissions: usize,
    /// User ↔ role rows added by this run
    pub user_roles: usize,
}

impl SeedConfig {
    /// Load a seed file, picking the format from the extension
    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let content = match extension.as_deref() {
            Some("yaml" | "yml" | "json") => std::fs::read_to_string(path)?,
            _ => return Err(SeedError::UnsupportedFormat(path.to_path_buf())),
        };
        if extension.as_deref() == Some("json") {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Write the seed into the graph behind `acl`
    pub fn apply<S: EntityStore>(&self, acl: &AccessControl<S>) -> Result<SeedReport, SeedError> {
        let mut report = SeedReport::default();

        for seed in &self.permissions {
            acl.find_or_create_permission(&NewPermission::new(&seed.name, &seed.description))?;
            report.permissions += 1;
        }

        for seed in &self.roles {
            let role = acl.find_or_create_role(&NewRole::new(&seed.name, &seed.description))?;
            report.roles += 1;
            if !seed.permissions.is_empty() {
                let before = acl.count_permissions_of_role(role.id)?;
                acl.assign_permissions_to_role(role.id, &seed.permissions)
                    .map_err(PartialResolution::into_error)?;
                report.role_permissions += acl.count_permissions_of_role(role.id)? - before;
            }
        }

        for seed in &self.users {
            if seed.roles.is_empty() {
                continue;
            }
            let before = held_roles(acl, seed.id)?;
            acl.assign_roles_to_user(seed.id, &seed.roles)?;
            report.user_roles += held_roles(acl, seed.id)? - before;
        }

        debug!(?report, "seed applied");
        Ok(report)
    }
}

fn held_roles<S: EntityStore>(acl: &AccessControl<S>, user_id: UserId) -> Result<usize, RbacError> {
    Ok(acl.store().role_ids_of_user(user_id)?.len())
}
