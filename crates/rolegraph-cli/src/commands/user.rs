//! rolegraph user command

use clap::{Args, Subcommand};
use rolegraph_domain::{EntityStore, RbacError, UserId};
use rolegraph_rbac::{role_names, AccessControl};

#[derive(Debug, Args)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum UserSubcommand {
    /// Show the roles held by a user, in assignment order
    Roles {
        /// User id
        id: u64,
    },
    /// Show the permissions a user reaches through its roles
    Permissions {
        /// User id
        id: u64,
        /// Keep duplicates reached through several roles
        #[arg(long)]
        raw: bool,
    },
}

impl UserCommand {
    pub fn run<S: EntityStore>(&self, acl: &AccessControl<S>, json: bool) -> anyhow::Result<()> {
        match &self.command {
            UserSubcommand::Roles { id } => {
                let roles = match acl.effective_roles(UserId::new(*id)) {
                    Ok(roles) => roles,
                    Err(RbacError::UserHasNoRoles(_)) => Vec::new(),
                    Err(err) => return Err(err.into()),
                };
                if json {
                    println!("{}", serde_json::to_string_pretty(&roles)?);
                } else if roles.is_empty() {
                    println!("User {} has no roles", id);
                } else {
                    println!("User {}: {}", id, role_names(&roles).join(", "));
                }
            }
            UserSubcommand::Permissions { id, raw } => {
                let user = UserId::new(*id);
                let permissions = if *raw {
                    acl.effective_permissions(user)?
                } else {
                    acl.effective_permission_set(user)?
                };
                if json {
                    println!("{}", serde_json::to_string_pretty(&permissions)?);
                } else if permissions.is_empty() {
                    println!("User {} has no permissions", id);
                } else {
                    let names: Vec<&str> = permissions.iter().map(|p| p.name.as_str()).collect();
                    println!("User {}: {}", id, names.join(", "));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolegraph_adapter::InMemoryStore;
    use rolegraph_domain::NewRole;

    fn roles_of(id: u64) -> UserCommand {
        UserCommand {
            command: UserSubcommand::Roles { id },
        }
    }

    #[test]
    fn test_user_without_roles_is_not_an_error() {
        let acl = AccessControl::new(InMemoryStore::new());
        assert!(roles_of(9).run(&acl, false).is_ok());
        assert!(roles_of(9).run(&acl, true).is_ok());

        let permissions = UserCommand {
            command: UserSubcommand::Permissions { id: 9, raw: false },
        };
        assert!(permissions.run(&acl, false).is_ok());
    }

    #[test]
    fn test_user_roles_for_known_user() {
        let acl = AccessControl::new(InMemoryStore::new());
        acl.find_or_create_role(&NewRole::new("editor", "")).unwrap();
        acl.assign_roles_to_user(UserId::new(1), &["editor"]).unwrap();
        assert!(roles_of(1).run(&acl, false).is_ok());
    }
}
