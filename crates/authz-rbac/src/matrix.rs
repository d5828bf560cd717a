//! # Role-Permission Matrix
//!
//! Static configuration mapping roles to allowed actions and to the baseline
//! permission set enumerated for a member of an organization.
//!
//! ```text
//! role    | view | edit | delete | manage
//! --------+------+------+--------+-------
//! owner   |  x   |  x   |   x    |   x
//! admin   |  x   |  x   |   x    |   x
//! editor  |  x   |  x   |        |
//! member  |  x   |      |        |
//! viewer  |  x   |      |        |
//! (none)  |      |      |        |
//! ```
//!
//! Every function here is total. A missing role, an unknown role name or an
//! unknown action name is answered with "deny".

use crate::actions::PermissionAction;
use crate::permissions::{Permission, PermissionSet};
use crate::resources::ResourceType;
use crate::roles::Role;

/// Decide whether `role` may perform `action`.
///
/// `None` is the sentinel for "no membership" and never allows anything.
///
/// # Example
///
/// ```
/// use authz_rbac::{matrix, PermissionAction, Role};
///
/// assert!(matrix::allows(Some(Role::Editor), PermissionAction::Edit));
/// assert!(!matrix::allows(Some(Role::Editor), PermissionAction::Delete));
/// assert!(!matrix::allows(None, PermissionAction::View));
/// ```
pub fn allows(role: Option<Role>, action: PermissionAction) -> bool {
    let Some(role) = role else {
        return false;
    };

    match role {
        Role::Owner | Role::Admin => true,
        Role::Editor => matches!(action, PermissionAction::View | PermissionAction::Edit),
        Role::Member | Role::Viewer => action == PermissionAction::View,
    }
}

/// String form of [`allows`] for callers holding unparsed names.
///
/// Anything that does not parse is denied.
///
/// # Example
///
/// ```
/// use authz_rbac::matrix;
///
/// assert!(matrix::allows_named("admin", "delete"));
/// assert!(!matrix::allows_named("superuser", "view"));
/// assert!(!matrix::allows_named("owner", "destroy"));
/// ```
pub fn allows_named(role: &str, action: &str) -> bool {
    match (Role::parse(role), PermissionAction::parse(action)) {
        (Some(role), Some(action)) => allows(Some(role), action),
        _ => false,
    }
}

/// The baseline permissions a role grants across the organization.
///
/// Department management derived from the department tree is layered on top
/// by the enumerator; it is not part of the baseline.
pub fn baseline_grants(role: Role) -> PermissionSet {
    use PermissionAction::*;
    use ResourceType::*;

    let grants: [(ResourceType, PermissionAction); 4] = match role {
        Role::Owner | Role::Admin => [
            (Organization, Manage),
            (Department, Manage),
            (Form, Manage),
            (Workflow, Manage),
        ],
        Role::Editor => [
            (Organization, View),
            (Department, View),
            (Form, Edit),
            (Workflow, Edit),
        ],
        Role::Member | Role::Viewer => [
            (Organization, View),
            (Department, View),
            (Form, View),
            (Workflow, View),
        ],
    };

    grants
        .into_iter()
        .map(|(resource, action)| Permission::new(resource, action))
        .collect()
}

/// The role a department manager is raised to for a department decision.
///
/// Only `member` and `editor` are raised (to `editor`). Owners and admins are
/// already maximal, and viewers keep their role even when they manage the
/// department.
pub fn elevate_for_department_manager(role: Option<Role>) -> Option<Role> {
    match role {
        Some(Role::Member) | Some(Role::Editor) => Some(Role::Editor),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_table() {
        let expected = [
            (Role::Owner, [true, true, true, true]),
            (Role::Admin, [true, true, true, true]),
            (Role::Editor, [true, true, false, false]),
            (Role::Member, [true, false, false, false]),
            (Role::Viewer, [true, false, false, false]),
        ];

        for (role, row) in expected {
            for (action, allowed) in PermissionAction::all().into_iter().zip(row) {
                assert_eq!(allows(Some(role), action), allowed, "{role}:{action}");
            }
        }
    }

    #[test]
    fn test_no_role_denies_everything() {
        for action in PermissionAction::all() {
            assert!(!allows(None, action));
        }
    }

    #[test]
    fn test_matrix_is_monotonic() {
        // manage => delete => edit => view for every role
        for role in Role::all() {
            let r = Some(role);
            if allows(r, PermissionAction::Manage) {
                assert!(allows(r, PermissionAction::Delete));
            }
            if allows(r, PermissionAction::Delete) {
                assert!(allows(r, PermissionAction::Edit));
            }
            if allows(r, PermissionAction::Edit) {
                assert!(allows(r, PermissionAction::View));
            }
        }
    }

    #[test]
    fn test_allows_named_fails_closed() {
        assert!(allows_named("Owner", "manage"));
        assert!(allows_named("member", "view"));
        assert!(!allows_named("member", "edit"));
        assert!(!allows_named("none", "view"));
        assert!(!allows_named("", ""));
        assert!(!allows_named("admin", "approve"));
    }

    #[test]
    fn test_baseline_grants() {
        let owner = baseline_grants(Role::Owner);
        assert_eq!(owner, baseline_grants(Role::Admin));
        assert_eq!(owner.len(), 4);
        assert!(owner.contains(&Permission::new(ResourceType::Organization, PermissionAction::Manage)));

        let editor = baseline_grants(Role::Editor);
        assert!(editor.contains(&Permission::new(ResourceType::Form, PermissionAction::Edit)));
        assert!(editor.contains(&Permission::new(ResourceType::Department, PermissionAction::View)));
        assert!(!editor.contains(&Permission::new(ResourceType::Organization, PermissionAction::Edit)));

        assert_eq!(baseline_grants(Role::Member), baseline_grants(Role::Viewer));
        assert!(baseline_grants(Role::Viewer)
            .iter()
            .all(|p| p.action == PermissionAction::View));
    }

    #[test]
    fn test_elevation_scope() {
        assert_eq!(elevate_for_department_manager(Some(Role::Member)), Some(Role::Editor));
        assert_eq!(elevate_for_department_manager(Some(Role::Editor)), Some(Role::Editor));
        assert_eq!(elevate_for_department_manager(Some(Role::Viewer)), Some(Role::Viewer));
        assert_eq!(elevate_for_department_manager(Some(Role::Admin)), Some(Role::Admin));
        assert_eq!(elevate_for_department_manager(None), None);
    }
}
