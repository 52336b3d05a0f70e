//! rolegraph roles / permissions commands

use clap::Args;
use rolegraph_domain::EntityStore;
use rolegraph_rbac::{role_names, AccessControl};

/// List every role with its permissions
#[derive(Debug, Args)]
pub struct RolesCommand {}

impl RolesCommand {
    pub fn run<S: EntityStore>(&self, acl: &AccessControl<S>, json: bool) -> anyhow::Result<()> {
        let roles = acl.list_roles()?;
        if json {
            let rows: Vec<_> = roles
                .iter()
                .map(|grants| {
                    serde_json::json!({
                        "role": grants.role,
                        "permissions": grants.permissions,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        if roles.is_empty() {
            println!("No roles defined");
        }
        for grants in &roles {
            let permissions: Vec<&str> = grants
                .permissions
                .iter()
                .map(|p| p.name.as_str())
                .collect();
            println!(
                "#{} {} [{}]",
                grants.role.id,
                grants.role.name,
                permissions.join(", ")
            );
        }
        Ok(())
    }
}

/// List every permission with the roles holding it
#[derive(Debug, Args)]
pub struct PermissionsCommand {}

impl PermissionsCommand {
    pub fn run<S: EntityStore>(&self, acl: &AccessControl<S>, json: bool) -> anyhow::Result<()> {
        let permissions = acl.list_permissions()?;
        if json {
            let rows: Vec<_> = permissions
                .iter()
                .map(|holders| {
                    serde_json::json!({
                        "permission": holders.permission,
                        "roles": holders.roles,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        if permissions.is_empty() {
            println!("No permissions defined");
        }
        for holders in &permissions {
            println!(
                "#{} {} [{}]",
                holders.permission.id,
                holders.permission.name,
                role_names(&holders.roles).join(", ")
            );
        }
        Ok(())
    }
}
