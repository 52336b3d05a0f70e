//! rolegraph check command

use clap::{ArgGroup, Args};
use console::style;
use rolegraph_domain::{EntityStore, RbacError, UserId};
use rolegraph_rbac::AccessControl;

/// Check whether a user holds roles or permissions
#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["roles", "permissions"])
))]
pub struct CheckCommand {
    /// User id
    #[arg(short, long)]
    pub user: u64,

    /// Role name (repeatable)
    #[arg(short, long = "role")]
    pub roles: Vec<String>,

    /// Permission name (repeatable)
    #[arg(short, long = "permission")]
    pub permissions: Vec<String>,

    /// Require every name instead of any one of them
    #[arg(long)]
    pub all: bool,
}

impl CheckCommand {
    /// Returns whether access is granted
    pub fn run<S: EntityStore>(&self, acl: &AccessControl<S>, json: bool) -> anyhow::Result<bool> {
        let user = UserId::new(self.user);
        let granted = match self.evaluate(acl, user) {
            Ok(granted) => granted,
            Err(RbacError::UserHasNoRoles(_)) => false,
            Err(err) => return Err(err.into()),
        };

        if json {
            println!(
                "{}",
                serde_json::json!({ "user": user, "all": self.all, "granted": granted })
            );
        } else if granted {
            println!("{} user {}", style("granted").green().bold(), user);
        } else {
            println!("{} user {}", style("denied").red().bold(), user);
        }
        Ok(granted)
    }

    fn evaluate<S: EntityStore>(&self, acl: &AccessControl<S>, user: UserId) -> rolegraph_domain::Result<bool> {
        if !self.roles.is_empty() {
            if self.all {
                acl.has_all_roles_containing(user, &self.roles)
            } else {
                acl.has_any_role(user, &self.roles)
            }
        } else if self.all {
            acl.has_all_permissions_containing(user, &self.permissions)
        } else {
            acl.has_any_permission(user, &self.permissions)
        }
    }
}
