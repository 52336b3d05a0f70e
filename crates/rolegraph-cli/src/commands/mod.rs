//! CLI Commands

pub mod check;
pub mod list;
pub mod user;

pub use check::CheckCommand;
pub use list::{PermissionsCommand, RolesCommand};
pub use user::UserCommand;
