//! Permission enumeration for one user in one organization.

use tracing::debug;
use uuid::Uuid;

use authz_rbac::{matrix, Permission, PermissionAction, PermissionSet, ResourceType};

use crate::hierarchy::DepartmentHierarchy;
use crate::state::StateView;

/// Lists every (resource type, action) grant a user holds.
pub struct PermissionEnumerator<'a> {
    view: &'a dyn StateView,
    max_depth: usize,
}

impl<'a> PermissionEnumerator<'a> {
    /// Create an enumerator reading from `view`.
    pub fn new(view: &'a dyn StateView, max_depth: usize) -> Self {
        Self { view, max_depth }
    }

    /// Grants of `user_id` in `organization_id`.
    ///
    /// Empty for non-members. Members get their role's baseline grants, plus
    /// `department:manage` when they manage any department of the
    /// organization.
    pub fn user_permissions(&self, user_id: Uuid, organization_id: Uuid) -> PermissionSet {
        let Some(role) = self.view.membership_role(user_id, organization_id) else {
            debug!(user_id = %user_id, organization_id = %organization_id, "no membership, no grants");
            return PermissionSet::new();
        };

        let mut grants = matrix::baseline_grants(role);
        let managed = DepartmentHierarchy::new(self.view, self.max_depth)
            .managed_departments(organization_id, user_id);
        if !managed.is_empty() {
            grants.add(Permission::new(ResourceType::Department, PermissionAction::Manage));
        }

        debug!(
            user_id = %user_id,
            organization_id = %organization_id,
            role = %role,
            managed_departments = managed.len(),
            grants = grants.len(),
            "enumerated permissions"
        );
        grants
    }
}
