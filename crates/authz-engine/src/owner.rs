//! Owning-organization resolution per resource type.

use uuid::Uuid;

use authz_rbac::ResourceType;

use crate::state::StateView;

/// Maps a resource id of one type to the organization that owns it.
pub trait OwningOrganization: Send + Sync {
    /// Owning organization, or `None` when the resource does not resolve.
    fn owning_organization(&self, view: &dyn StateView, resource_id: Uuid) -> Option<Uuid>;
}

/// Organizations own themselves.
#[derive(Debug, Clone, Copy)]
pub struct OrganizationOwner;

impl OwningOrganization for OrganizationOwner {
    fn owning_organization(&self, view: &dyn StateView, resource_id: Uuid) -> Option<Uuid> {
        view.organization(resource_id).map(|org| org.id)
    }
}

/// Departments carry their organization on the row.
#[derive(Debug, Clone, Copy)]
pub struct DepartmentOwner;

impl OwningOrganization for DepartmentOwner {
    fn owning_organization(&self, view: &dyn StateView, resource_id: Uuid) -> Option<Uuid> {
        view.department(resource_id).map(|d| d.organization_id)
    }
}

/// Collaborator-owned records resolve through the resource registry.
#[derive(Debug, Clone, Copy)]
pub struct RecordOwner(pub ResourceType);

impl OwningOrganization for RecordOwner {
    fn owning_organization(&self, view: &dyn StateView, resource_id: Uuid) -> Option<Uuid> {
        view.resource_owner(self.0, resource_id)
    }
}

static ORGANIZATION_OWNER: OrganizationOwner = OrganizationOwner;
static DEPARTMENT_OWNER: DepartmentOwner = DepartmentOwner;
static WORKFLOW_OWNER: RecordOwner = RecordOwner(ResourceType::Workflow);
static FORM_OWNER: RecordOwner = RecordOwner(ResourceType::Form);

/// Resolver for a resource type.
pub fn owner_for(resource_type: ResourceType) -> &'static dyn OwningOrganization {
    match resource_type {
        ResourceType::Organization => &ORGANIZATION_OWNER,
        ResourceType::Department => &DEPARTMENT_OWNER,
        ResourceType::Workflow => &WORKFLOW_OWNER,
        ResourceType::Form => &FORM_OWNER,
    }
}

/// Owning organization of any resource.
pub fn resolve_owner(
    view: &dyn StateView,
    resource_type: ResourceType,
    resource_id: Uuid,
) -> Option<Uuid> {
    owner_for(resource_type).owning_organization(view, resource_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AuthzState;
    use authz_org::{Department, Organization, ResourceRecord};

    #[test]
    fn test_resolution_per_type() {
        let mut state = AuthzState::new();
        let org = Organization::new("Acme", Uuid::now_v7());
        let org_id = org.id;
        state.organizations.insert(org.id, org);

        let dept = Department::new(org_id, "Ops");
        let dept_id = dept.id;
        state.put_department(dept);

        let form_id = Uuid::now_v7();
        let record = ResourceRecord::new(ResourceType::Form, form_id, org_id);
        state.resources.insert(record.key(), record);

        assert_eq!(resolve_owner(&state, ResourceType::Organization, org_id), Some(org_id));
        assert_eq!(resolve_owner(&state, ResourceType::Department, dept_id), Some(org_id));
        assert_eq!(resolve_owner(&state, ResourceType::Form, form_id), Some(org_id));
        // A form id is not a workflow id
        assert_eq!(resolve_owner(&state, ResourceType::Workflow, form_id), None);
        assert_eq!(resolve_owner(&state, ResourceType::Organization, Uuid::now_v7()), None);
    }
}
