use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Account role within the venue hierarchy.
///
/// Ordered `Admin > Manager > Staff`. Serialized in lowercase
/// (`"admin"`, `"manager"`, `"staff"`), both in tokens and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Staff,
}

/// Error for role parsing failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role: {0} (expected admin, manager or staff)")]
pub struct ParseRoleError(pub String);

impl Role {
    /// All roles, highest first.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Staff];

    /// Rank in the hierarchy. Higher outranks lower.
    pub fn level(&self) -> u8 {
        match self {
            Role::Admin => 3,
            Role::Manager => 2,
            Role::Staff => 1,
        }
    }

    /// Check whether this role strictly outranks `other`.
    pub fn outranks(&self, other: Role) -> bool {
        self.level() > other.level()
    }

    /// Human-readable title shown on profiles.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "System Administrator",
            Role::Manager => "Management Team",
            Role::Staff => "Staff Member",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}
