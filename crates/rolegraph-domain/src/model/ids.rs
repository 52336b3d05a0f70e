//! Identifiers
//!
//! Identifiers are assigned by the store (roles, permissions) or by the
//! caller (users). The core never generates them.

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Primary key of a [`Role`](super::role::Role)
    RoleId
);

numeric_id!(
    /// Primary key of a [`Permission`](super::permission::Permission)
    PermissionId
);

numeric_id!(
    /// Opaque user identifier supplied by the caller
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct_types_with_same_display() {
        let role = RoleId::new(7);
        let user = UserId::from(7);
        assert_eq!(role.to_string(), user.to_string());
        assert_eq!(role.get(), 7);
    }

    #[test]
    fn test_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&UserId::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
