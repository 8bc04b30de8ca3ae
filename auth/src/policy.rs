//! Actor-versus-target permission rules.
//!
//! These functions decide whether an actor holding one role may act on an
//! account holding another. They are independent of endpoint-level gating,
//! which only checks the actor's role against an allowed set.
//!
//! Accounts are only ever created below the creator's own rank. Admins may
//! assign any role on update except demoting an existing admin, managers may
//! not touch roles at all, and no one may delete an admin.
//!
//! Self-service registration has no actor and is not covered here; it
//! accepts whatever role the caller asks for.

use crate::role::Role;

/// Whether `actor` may create an account with role `target`.
///
/// | actor   | admin | manager | staff |
/// |---------|-------|---------|-------|
/// | admin   | deny  | allow   | allow |
/// | manager | deny  | deny    | allow |
/// | staff   | deny  | deny    | deny  |
pub fn can_create(actor: Role, target: Role) -> bool {
    match actor {
        Role::Admin | Role::Manager => actor.outranks(target),
        Role::Staff => false,
    }
}

/// Whether `actor` may update an account currently holding role `target`.
///
/// `requested_role` is the role carried by the update, if any. Its presence
/// counts as a role change even when it equals the current role.
///
/// - admin: any target, except moving an admin to a non-admin role
/// - manager: staff targets only, and never with a role field
/// - staff: nothing
pub fn can_update(actor: Role, target: Role, requested_role: Option<Role>) -> bool {
    match actor {
        Role::Admin => match (target, requested_role) {
            (Role::Admin, Some(Role::Manager | Role::Staff)) => false,
            _ => true,
        },
        Role::Manager => match target {
            Role::Staff => requested_role.is_none(),
            Role::Admin | Role::Manager => false,
        },
        Role::Staff => false,
    }
}

/// Whether `actor` may delete an account holding role `target`.
///
/// | actor   | admin | manager | staff |
/// |---------|-------|---------|-------|
/// | admin   | deny  | deny    | allow |
/// | manager | deny  | deny    | allow |
/// | staff   | deny  | deny    | deny  |
pub fn can_delete(actor: Role, target: Role) -> bool {
    match actor {
        Role::Admin | Role::Manager => match target {
            Role::Staff => true,
            // Manager-on-manager has no rule of its own; treated as a denial.
            Role::Admin | Role::Manager => false,
        },
        Role::Staff => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Role::*;

    #[test]
    fn test_can_create_table() {
        let expected = [
            (Admin, Admin, false),
            (Admin, Manager, true),
            (Admin, Staff, true),
            (Manager, Admin, false),
            (Manager, Manager, false),
            (Manager, Staff, true),
            (Staff, Admin, false),
            (Staff, Manager, false),
            (Staff, Staff, false),
        ];

        for (actor, target, allowed) in expected {
            assert_eq!(
                can_create(actor, target),
                allowed,
                "can_create({actor}, {target})"
            );
        }
    }

    #[test]
    fn test_can_delete_table() {
        let expected = [
            (Admin, Admin, false),
            (Admin, Manager, false),
            (Admin, Staff, true),
            (Manager, Admin, false),
            (Manager, Manager, false),
            (Manager, Staff, true),
            (Staff, Admin, false),
            (Staff, Manager, false),
            (Staff, Staff, false),
        ];

        for (actor, target, allowed) in expected {
            assert_eq!(
                can_delete(actor, target),
                allowed,
                "can_delete({actor}, {target})"
            );
        }
    }

    #[test]
    fn test_admin_updates() {
        for target in Role::ALL {
            assert!(can_update(Admin, target, None));
        }

        // Admins may be kept admin but not demoted
        assert!(can_update(Admin, Admin, Some(Admin)));
        assert!(!can_update(Admin, Admin, Some(Manager)));
        assert!(!can_update(Admin, Admin, Some(Staff)));

        // Non-admin targets may be moved anywhere
        assert!(can_update(Admin, Manager, Some(Staff)));
        assert!(can_update(Admin, Staff, Some(Manager)));
        assert!(can_update(Admin, Staff, Some(Admin)));
    }

    #[test]
    fn test_manager_updates() {
        assert!(can_update(Manager, Staff, None));
        assert!(!can_update(Manager, Manager, None));
        assert!(!can_update(Manager, Admin, None));

        // Any role field is rejected, including a no-op
        assert!(!can_update(Manager, Staff, Some(Staff)));
        assert!(!can_update(Manager, Staff, Some(Manager)));
    }

    #[test]
    fn test_staff_updates_nothing() {
        for target in Role::ALL {
            assert!(!can_update(Staff, target, None));
            for requested in Role::ALL {
                assert!(!can_update(Staff, target, Some(requested)));
            }
        }
    }

    #[test]
    fn test_no_actor_creates_peer_or_superior() {
        for actor in Role::ALL {
            for target in Role::ALL {
                if !actor.outranks(target) {
                    assert!(!can_create(actor, target));
                }
            }
        }
    }
}
