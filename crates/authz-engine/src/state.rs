//! Authorization state tables and the read view over them.
//!
//! `AuthzState` is one consistent version of every table the engine owns.
//! Reads go through [`StateView`] so the decision logic does not care whether
//! it is looking at a committed snapshot or at a transaction's working copy.

use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use authz_org::{
    AuditLogEntry, Department, Membership, MembershipKey, Organization, ResourceRecord,
    UserProfile,
};
use authz_rbac::{ResourceType, Role};

use crate::audit::AuditTable;

/// Read access to membership, department and ownership state.
///
/// Every method answers from one version of the state; implementations must
/// not mix rows from different versions.
pub trait StateView: Send + Sync {
    /// Look up an organization.
    fn organization(&self, id: Uuid) -> Option<&Organization>;

    /// Role of `user_id` in `organization_id`, `None` without a membership.
    fn membership_role(&self, user_id: Uuid, organization_id: Uuid) -> Option<Role>;

    /// Look up a department.
    fn department(&self, id: Uuid) -> Option<&Department>;

    /// Direct children of a department.
    fn child_departments(&self, id: Uuid) -> Vec<Uuid>;

    /// Every department of an organization.
    fn departments_in(&self, organization_id: Uuid) -> Vec<&Department>;

    /// Owning organization of a collaborator record.
    fn resource_owner(&self, resource_type: ResourceType, resource_id: Uuid) -> Option<Uuid>;
}

/// All tables owned by the engine.
#[derive(Debug, Clone, Default)]
pub struct AuthzState {
    pub(crate) organizations: HashMap<Uuid, Organization>,
    pub(crate) memberships: HashMap<MembershipKey, Membership>,
    pub(crate) departments: HashMap<Uuid, Department>,
    pub(crate) children: HashMap<Uuid, BTreeSet<Uuid>>,
    pub(crate) profiles: HashMap<Uuid, UserProfile>,
    pub(crate) resources: HashMap<(ResourceType, Uuid), ResourceRecord>,
    pub(crate) audit: AuditTable,
}

impl AuthzState {
    /// Create empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Membership row for a (user, organization) pair.
    pub fn membership(&self, user_id: Uuid, organization_id: Uuid) -> Option<&Membership> {
        self.memberships
            .get(&MembershipKey::new(user_id, organization_id))
    }

    /// All memberships of an organization, ordered by user id.
    pub fn members_of(&self, organization_id: Uuid) -> Vec<&Membership> {
        let mut members: Vec<&Membership> = self
            .memberships
            .values()
            .filter(|m| m.organization_id == organization_id)
            .collect();
        members.sort_by_key(|m| m.user_id);
        members
    }

    /// Profile-level department fields of a user.
    pub fn profile(&self, user_id: Uuid) -> Option<&UserProfile> {
        self.profiles.get(&user_id)
    }

    /// The audit table, in append order.
    pub fn audit_log(&self) -> &[AuditLogEntry] {
        self.audit.entries()
    }

    /// Number of organizations.
    pub fn organization_count(&self) -> usize {
        self.organizations.len()
    }

    // ------------------------------------------------------------------
    // Row writes. Invariant checks live in `Transaction`; these only keep
    // the tables and the children index in step.
    // ------------------------------------------------------------------

    pub(crate) fn put_department(&mut self, department: Department) {
        if let Some(previous) = self.departments.get(&department.id) {
            if let Some(old_parent) = previous.parent_id {
                self.unlink_child(old_parent, department.id);
            }
        }
        if let Some(parent) = department.parent_id {
            self.children.entry(parent).or_default().insert(department.id);
        }
        self.departments.insert(department.id, department);
    }

    pub(crate) fn drop_department(&mut self, id: Uuid) -> Option<Department> {
        let removed = self.departments.remove(&id)?;
        if let Some(parent) = removed.parent_id {
            self.unlink_child(parent, id);
        }
        self.children.remove(&id);
        Some(removed)
    }

    fn unlink_child(&mut self, parent: Uuid, child: Uuid) {
        if let Some(siblings) = self.children.get_mut(&parent) {
            siblings.remove(&child);
            if siblings.is_empty() {
                self.children.remove(&parent);
            }
        }
    }
}

impl StateView for AuthzState {
    fn organization(&self, id: Uuid) -> Option<&Organization> {
        self.organizations.get(&id)
    }

    fn membership_role(&self, user_id: Uuid, organization_id: Uuid) -> Option<Role> {
        self.membership(user_id, organization_id).map(|m| m.role)
    }

    fn department(&self, id: Uuid) -> Option<&Department> {
        self.departments.get(&id)
    }

    fn child_departments(&self, id: Uuid) -> Vec<Uuid> {
        self.children
            .get(&id)
            .map(|c| c.iter().copied().collect())
            .unwrap_or_default()
    }

    fn departments_in(&self, organization_id: Uuid) -> Vec<&Department> {
        let mut departments: Vec<&Department> = self
            .departments
            .values()
            .filter(|d| d.organization_id == organization_id)
            .collect();
        departments.sort_by_key(|d| d.id);
        departments
    }

    fn resource_owner(&self, resource_type: ResourceType, resource_id: Uuid) -> Option<Uuid> {
        self.resources
            .get(&(resource_type, resource_id))
            .map(|r| r.organization_id)
    }
}
