//! Write transactions.
//!
//! A `Transaction` is a private working copy of the committed state plus the
//! store's writer lock. Reads made through it see its own uncommitted writes;
//! nothing is visible to other readers until the store commits it. Dropping a
//! transaction without committing discards every write.

use std::ops::Deref;

use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use authz_org::{
    AuditLogEntry, Department, DepartmentRole, Membership, MembershipKey, Organization,
    ResourceRecord, UserProfile,
};
use authz_rbac::{ResourceType, Role};

use crate::audit::{append_audited, AuditLogger, MembershipChange};
use crate::config::EngineConfig;
use crate::error::{AuthzError, AuthzResult};
use crate::hierarchy::DepartmentHierarchy;
use crate::state::{AuthzState, StateView};

/// Uncommitted changes against one store.
pub struct Transaction {
    store_id: Uuid,
    state: AuthzState,
    max_depth: usize,
    _writer: OwnedMutexGuard<()>,
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("store_id", &self.store_id)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl Deref for Transaction {
    type Target = AuthzState;

    fn deref(&self) -> &AuthzState {
        &self.state
    }
}

impl Transaction {
    pub(crate) fn new(store_id: Uuid, state: AuthzState, writer: OwnedMutexGuard<()>) -> Self {
        Self {
            store_id,
            state,
            max_depth: EngineConfig::DEFAULT_MAX_DEPARTMENT_DEPTH,
            _writer: writer,
        }
    }

    /// Set the department depth guard used by hierarchy checks.
    pub fn with_depth_limit(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Store this transaction was started on.
    pub fn store_id(&self) -> Uuid {
        self.store_id
    }

    /// Split into the working copy and the writer lock.
    pub(crate) fn into_parts(self) -> (Uuid, AuthzState, OwnedMutexGuard<()>) {
        (self.store_id, self.state, self._writer)
    }

    fn hierarchy(&self) -> DepartmentHierarchy<'_, AuthzState> {
        DepartmentHierarchy::new(&self.state, self.max_depth)
    }

    fn require_organization(&self, organization_id: Uuid) -> AuthzResult<()> {
        match self.state.organization(organization_id) {
            Some(_) => Ok(()),
            None => Err(AuthzError::not_found("organization", organization_id)),
        }
    }

    // ------------------------------------------------------------------
    // Organizations
    // ------------------------------------------------------------------

    /// Insert a new organization.
    pub fn insert_organization(&mut self, organization: Organization) -> AuthzResult<()> {
        if self.state.organizations.contains_key(&organization.id) {
            return Err(AuthzError::ConstraintViolation(format!(
                "organization {} already exists",
                organization.id
            )));
        }
        self.state.organizations.insert(organization.id, organization);
        Ok(())
    }

    /// Delete an organization and everything it owns.
    ///
    /// Memberships are removed through the audited path; departments,
    /// resource records and profile assignments into the organization are
    /// dropped. Audit entries are kept.
    pub fn remove_organization(
        &mut self,
        audit: &dyn AuditLogger,
        actor_id: Uuid,
        organization_id: Uuid,
    ) -> AuthzResult<Organization> {
        self.require_organization(organization_id)?;

        let members: Vec<Uuid> = self
            .state
            .members_of(organization_id)
            .into_iter()
            .map(|m| m.user_id)
            .collect();
        for user_id in members {
            self.remove_membership(audit, actor_id, user_id, organization_id)?;
        }

        let departments: Vec<Uuid> = self
            .state
            .departments_in(organization_id)
            .into_iter()
            .map(|d| d.id)
            .collect();
        for profile in self.state.profiles.values_mut() {
            if profile
                .department_id
                .is_some_and(|id| departments.contains(&id))
            {
                profile.clear_department();
            }
        }
        for id in departments {
            self.state.drop_department(id);
        }

        self.state
            .resources
            .retain(|_, record| record.organization_id != organization_id);

        self.state
            .organizations
            .remove(&organization_id)
            .ok_or_else(|| AuthzError::not_found("organization", organization_id))
    }

    // ------------------------------------------------------------------
    // Memberships
    // ------------------------------------------------------------------

    /// Create or change a membership, recording the change in the audit log.
    ///
    /// Writing the role a user already holds changes nothing and records
    /// nothing.
    pub fn upsert_membership(
        &mut self,
        audit: &dyn AuditLogger,
        actor_id: Uuid,
        user_id: Uuid,
        organization_id: Uuid,
        role: Role,
    ) -> AuthzResult<MembershipChange> {
        self.require_organization(organization_id)?;
        let key = MembershipKey::new(user_id, organization_id);

        let previous = self.state.memberships.get(&key).map(|m| m.role);
        match previous {
            Some(previous) if previous == role => Ok(MembershipChange::Unchanged),
            Some(previous) => {
                append_audited(
                    audit,
                    &mut self.state.audit,
                    AuditLogEntry::updated(user_id, organization_id, previous, role, actor_id),
                )?;
                let membership = self
                    .state
                    .memberships
                    .get_mut(&key)
                    .ok_or_else(|| AuthzError::Store("membership row vanished".to_string()))?;
                membership.change_role(role);
                Ok(MembershipChange::Updated {
                    membership: membership.clone(),
                    previous,
                })
            }
            None => {
                append_audited(
                    audit,
                    &mut self.state.audit,
                    AuditLogEntry::inserted(user_id, organization_id, role, actor_id),
                )?;
                let mut membership = Membership::new(organization_id, user_id, role);
                if !actor_id.is_nil() && actor_id != user_id {
                    membership = membership.with_inviter(actor_id);
                }
                self.state.memberships.insert(key, membership.clone());
                Ok(MembershipChange::Inserted(membership))
            }
        }
    }

    /// Delete a membership, recording the deletion in the audit log.
    pub fn remove_membership(
        &mut self,
        audit: &dyn AuditLogger,
        actor_id: Uuid,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> AuthzResult<MembershipChange> {
        let key = MembershipKey::new(user_id, organization_id);
        let Some(role) = self.state.memberships.get(&key).map(|m| m.role) else {
            return Ok(MembershipChange::Unchanged);
        };

        append_audited(
            audit,
            &mut self.state.audit,
            AuditLogEntry::deleted(user_id, organization_id, role, actor_id),
        )?;
        match self.state.memberships.remove(&key) {
            Some(membership) => Ok(MembershipChange::Removed(membership)),
            None => Ok(MembershipChange::Unchanged),
        }
    }

    // ------------------------------------------------------------------
    // Departments
    // ------------------------------------------------------------------

    /// Insert a department.
    ///
    /// The parent, if any, must exist in the same organization and the new
    /// department must fit under the depth guard.
    pub fn insert_department(&mut self, department: Department) -> AuthzResult<()> {
        self.require_organization(department.organization_id)?;
        if self.state.departments.contains_key(&department.id) {
            return Err(AuthzError::ConstraintViolation(format!(
                "department {} already exists",
                department.id
            )));
        }
        if let Some(parent_id) = department.parent_id {
            if parent_id == department.id {
                return Err(AuthzError::ConstraintViolation(format!(
                    "department {parent_id} cannot be its own parent"
                )));
            }
            self.check_parent(department.id, department.organization_id, parent_id, 0)?;
        }
        self.state.put_department(department);
        Ok(())
    }

    /// Move a department under a new parent, or make it a root.
    pub fn set_department_parent(
        &mut self,
        department_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> AuthzResult<Department> {
        let mut department = self
            .state
            .department(department_id)
            .cloned()
            .ok_or_else(|| AuthzError::not_found("department", department_id))?;

        if let Some(parent_id) = parent_id {
            if parent_id == department_id {
                return Err(AuthzError::ConstraintViolation(format!(
                    "department {department_id} cannot be its own parent"
                )));
            }
            if self.hierarchy().would_create_cycle(department_id, parent_id) {
                return Err(AuthzError::ConstraintViolation(format!(
                    "moving department {department_id} under {parent_id} would create a cycle"
                )));
            }
            let height = self.hierarchy().height(department_id);
            self.check_parent(department_id, department.organization_id, parent_id, height)?;
        }

        department.parent_id = parent_id;
        self.state.put_department(department.clone());
        Ok(department)
    }

    /// Set or clear a department's manager.
    pub fn set_department_manager(
        &mut self,
        department_id: Uuid,
        manager_id: Option<Uuid>,
    ) -> AuthzResult<Department> {
        let department = self
            .state
            .departments
            .get_mut(&department_id)
            .ok_or_else(|| AuthzError::not_found("department", department_id))?;
        department.manager_id = manager_id;
        Ok(department.clone())
    }

    /// Validate a prospective parent for a department whose subtree is
    /// `subtree_height` levels tall.
    fn check_parent(
        &self,
        department_id: Uuid,
        organization_id: Uuid,
        parent_id: Uuid,
        subtree_height: usize,
    ) -> AuthzResult<()> {
        let parent = self
            .state
            .department(parent_id)
            .ok_or_else(|| AuthzError::not_found("department", parent_id))?;
        if parent.organization_id != organization_id {
            return Err(AuthzError::ConstraintViolation(format!(
                "parent {parent_id} of department {department_id} belongs to another organization"
            )));
        }
        let parent_depth = self.hierarchy().depth(parent_id).ok_or_else(|| {
            AuthzError::ConstraintViolation(format!(
                "parent {parent_id} is not reachable from a root"
            ))
        })?;
        if parent_depth + 1 + subtree_height > self.max_depth {
            return Err(AuthzError::ConstraintViolation(format!(
                "department tree would exceed the maximum depth of {}",
                self.max_depth
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Profiles and resource records
    // ------------------------------------------------------------------

    /// Assign a user to a department with a department-scoped role.
    pub fn assign_department(
        &mut self,
        user_id: Uuid,
        department_id: Uuid,
        role: DepartmentRole,
    ) -> AuthzResult<UserProfile> {
        if self.state.department(department_id).is_none() {
            return Err(AuthzError::not_found("department", department_id));
        }
        let profile = self
            .state
            .profiles
            .entry(user_id)
            .or_insert_with(|| UserProfile::new(user_id));
        profile.assign(department_id, role);
        Ok(profile.clone())
    }

    /// Record which organization owns a collaborator record.
    pub fn insert_resource(&mut self, record: ResourceRecord) -> AuthzResult<()> {
        if !record.resource_type.is_collaborator_owned() {
            return Err(AuthzError::InvalidInput(format!(
                "{} ownership is resolved natively and cannot be registered",
                record.resource_type
            )));
        }
        self.require_organization(record.organization_id)?;
        if let Some(existing) = self.state.resources.get(&record.key()) {
            if existing.organization_id != record.organization_id {
                return Err(AuthzError::ConstraintViolation(format!(
                    "{} {} is already owned by organization {}",
                    record.resource_type, record.resource_id, existing.organization_id
                )));
            }
        }
        self.state.resources.insert(record.key(), record);
        Ok(())
    }

    /// Forget a collaborator record.
    pub fn remove_resource(
        &mut self,
        resource_type: ResourceType,
        resource_id: Uuid,
    ) -> Option<ResourceRecord> {
        self.state.resources.remove(&(resource_type, resource_id))
    }
}
