use auth::Role;

use crate::domain::account::models::Account;

/// Capability summary shown on a profile.
///
/// Informational only; enforcement lives in the role gate and the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePermissions {
    pub can_manage_users: bool,
    pub can_manage_roles: bool,
    pub can_manage_system: bool,
    pub access_permissions: &'static [&'static str],
}

impl ProfilePermissions {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Self {
                can_manage_users: true,
                can_manage_roles: true,
                can_manage_system: true,
                access_permissions: &[
                    "Full system access",
                    "User management",
                    "Role assignment",
                    "System configuration",
                    "Financial reports",
                    "Inventory management",
                    "Order processing",
                    "Reservation management",
                    "Event management",
                    "Customer data access",
                ],
            },
            Role::Manager => Self {
                can_manage_users: true,
                can_manage_roles: false,
                can_manage_system: false,
                access_permissions: &[
                    "Dashboard access",
                    "Team management",
                    "Order processing",
                    "Reservation management",
                    "Event management",
                    "Inventory oversight",
                    "Staff scheduling",
                    "Basic reporting",
                ],
            },
            Role::Staff => Self {
                can_manage_users: false,
                can_manage_roles: false,
                can_manage_system: false,
                access_permissions: &[
                    "Dashboard access",
                    "Order processing",
                    "Reservation management",
                    "Event assistance",
                    "Inventory updates",
                    "Customer service",
                ],
            },
        }
    }
}

/// Account as seen by its owner.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub account: Account,
    pub role_display: &'static str,
    /// `YYYY-MM-DD` of the creation timestamp
    pub join_date: String,
    pub permissions: ProfilePermissions,
}

impl From<Account> for ProfileView {
    fn from(account: Account) -> Self {
        Self {
            role_display: account.role.display_name(),
            join_date: account.created_at.format("%Y-%m-%d").to_string(),
            permissions: ProfilePermissions::for_role(account.role),
            account,
        }
    }
}
