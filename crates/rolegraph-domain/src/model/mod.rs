//! Domain Models - Roles, permissions and the identifiers linking them

pub mod ids;
pub mod permission;
pub mod role;
