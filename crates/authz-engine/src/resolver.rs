//! Single-permission decisions.
//!
//! The resolver answers "may this user perform this action on this
//! resource" against one state version. It never writes and never fails:
//! anything that cannot be resolved is a deny.

use tracing::debug;
use uuid::Uuid;

use authz_rbac::{matrix, PermissionAction, ResourceType, Role};

use crate::hierarchy::DepartmentHierarchy;
use crate::owner::resolve_owner;
use crate::state::StateView;

/// Permission resolver over one state version.
pub struct PermissionResolver<'a> {
    view: &'a dyn StateView,
    max_depth: usize,
}

impl<'a> PermissionResolver<'a> {
    /// Create a resolver reading from `view`.
    pub fn new(view: &'a dyn StateView, max_depth: usize) -> Self {
        Self { view, max_depth }
    }

    /// Role the decision is evaluated with, after department elevation.
    ///
    /// `None` when the resource does not resolve to an organization or the
    /// user is not a member of it.
    pub fn effective_role(
        &self,
        resource_type: ResourceType,
        resource_id: Uuid,
        user_id: Uuid,
    ) -> Option<Role> {
        let organization_id = resolve_owner(self.view, resource_type, resource_id)?;
        let role = self.view.membership_role(user_id, organization_id);

        if resource_type == ResourceType::Department
            && DepartmentHierarchy::new(self.view, self.max_depth)
                .is_manager_or_above(resource_id, user_id)
        {
            return matrix::elevate_for_department_manager(role);
        }
        role
    }

    /// Whether `user_id` may perform `action` on the resource.
    pub fn has_permission(
        &self,
        resource_type: ResourceType,
        resource_id: Uuid,
        action: PermissionAction,
        user_id: Uuid,
    ) -> bool {
        let role = self.effective_role(resource_type, resource_id, user_id);
        let allowed = matrix::allows(role, action);
        debug!(
            user_id = %user_id,
            resource_type = %resource_type,
            resource_id = %resource_id,
            action = %action,
            effective_role = role.map(|r| r.as_str()).unwrap_or("none"),
            allowed,
            "permission check"
        );
        allowed
    }

    /// String entry point; any value that does not parse denies.
    pub fn has_permission_named(
        &self,
        resource_type: &str,
        resource_id: &str,
        action: &str,
        user_id: Uuid,
    ) -> bool {
        let parsed = (
            ResourceType::parse(resource_type),
            Uuid::parse_str(resource_id.trim()).ok(),
            PermissionAction::parse(action),
        );
        match parsed {
            (Some(resource_type), Some(resource_id), Some(action)) => {
                self.has_permission(resource_type, resource_id, action, user_id)
            }
            _ => {
                debug!(
                    user_id = %user_id,
                    resource_type,
                    resource_id,
                    action,
                    "unparseable permission check denied"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AuthzState;
    use authz_org::{Department, Membership, Organization};

    struct Fixture {
        state: AuthzState,
        org: Uuid,
        parent: Uuid,
        child: Uuid,
    }

    fn fixture() -> Fixture {
        let mut state = AuthzState::new();
        let org = Organization::new("Acme", Uuid::now_v7());
        let org_id = org.id;
        state.organizations.insert(org.id, org);
        let parent = Department::new(org_id, "Parent");
        let child = Department::new(org_id, "Child").with_parent(parent.id);
        let (parent_id, child_id) = (parent.id, child.id);
        state.put_department(parent);
        state.put_department(child);
        Fixture {
            state,
            org: org_id,
            parent: parent_id,
            child: child_id,
        }
    }

    fn join(f: &mut Fixture, user: Uuid, role: Role) {
        let m = Membership::new(f.org, user, role);
        f.state.memberships.insert(m.key(), m);
    }

    fn manage(f: &mut Fixture, department: Uuid, user: Uuid) {
        let d = f.state.departments[&department].clone().with_manager(user);
        f.state.put_department(d);
    }

    #[test]
    fn test_non_member_denied() {
        let f = fixture();
        let r = PermissionResolver::new(&f.state, 32);
        for action in PermissionAction::all() {
            assert!(!r.has_permission(ResourceType::Organization, f.org, action, Uuid::now_v7()));
        }
    }

    #[test]
    fn test_member_manager_elevated_on_department_only() {
        let mut f = fixture();
        let user = Uuid::now_v7();
        join(&mut f, user, Role::Member);
        let parent = f.parent;
        manage(&mut f, parent, user);
        let r = PermissionResolver::new(&f.state, 32);

        assert!(r.has_permission(ResourceType::Department, f.child, PermissionAction::Edit, user));
        assert!(!r.has_permission(ResourceType::Department, f.child, PermissionAction::Delete, user));
        assert!(!r.has_permission(ResourceType::Organization, f.org, PermissionAction::Edit, user));
    }

    #[test]
    fn test_viewer_manager_not_elevated() {
        let mut f = fixture();
        let user = Uuid::now_v7();
        join(&mut f, user, Role::Viewer);
        let parent = f.parent;
        manage(&mut f, parent, user);
        let r = PermissionResolver::new(&f.state, 32);

        assert!(r.has_permission(ResourceType::Department, f.parent, PermissionAction::View, user));
        assert!(!r.has_permission(ResourceType::Department, f.parent, PermissionAction::Edit, user));
    }

    #[test]
    fn test_child_manager_gets_nothing_upward() {
        let mut f = fixture();
        let user = Uuid::now_v7();
        join(&mut f, user, Role::Member);
        let child = f.child;
        manage(&mut f, child, user);
        let r = PermissionResolver::new(&f.state, 32);

        assert!(r.has_permission(ResourceType::Department, f.child, PermissionAction::Edit, user));
        assert!(!r.has_permission(ResourceType::Department, f.parent, PermissionAction::Edit, user));
    }

    #[test]
    fn test_manager_without_membership_denied() {
        let mut f = fixture();
        let user = Uuid::now_v7();
        let parent = f.parent;
        manage(&mut f, parent, user);
        let r = PermissionResolver::new(&f.state, 32);

        assert!(!r.has_permission(ResourceType::Department, f.child, PermissionAction::View, user));
    }

    #[test]
    fn test_named_entry_point() {
        let mut f = fixture();
        let user = Uuid::now_v7();
        join(&mut f, user, Role::Admin);
        let r = PermissionResolver::new(&f.state, 32);
        let org = f.org.to_string();

        assert!(r.has_permission_named("organization", &org, "manage", user));
        assert!(!r.has_permission_named("organization", &org, "approve", user));
        assert!(!r.has_permission_named("project", &org, "view", user));
        assert!(!r.has_permission_named("organization", "not-a-uuid", "view", user));
    }
}
