//! Department domain model
//!
//! Departments form a tree inside one organization. Each department may name
//! a manager; managing a department grants authority over it and over every
//! department beneath it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A node in an organization's department tree.
///
/// Invariants, enforced by the writer rather than by this type:
/// - `parent_id` never equals `id`
/// - the parent belongs to the same organization
/// - following `parent_id` always reaches a root
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use authz_org::Department;
///
/// let org_id = Uuid::now_v7();
/// let root = Department::new(org_id, "Engineering");
/// let platform = Department::new(org_id, "Platform").with_parent(root.id);
///
/// assert!(root.is_root());
/// assert_eq!(platform.parent_id, Some(root.id));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Department {
    /// Unique department ID
    pub id: Uuid,

    /// Owning organization
    pub organization_id: Uuid,

    /// Display name
    pub name: String,

    /// Parent department, `None` for a root
    pub parent_id: Option<Uuid>,

    /// Managing user, if any
    pub manager_id: Option<Uuid>,

    /// When the department was created
    pub created_at: DateTime<Utc>,
}

impl Department {
    /// Creates a root department without a manager.
    pub fn new(organization_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            name: name.into(),
            parent_id: None,
            manager_id: None,
            created_at: Utc::now(),
        }
    }

    /// Place the department under `parent_id`.
    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Assign a manager.
    pub fn with_manager(mut self, manager_id: Uuid) -> Self {
        self.manager_id = Some(manager_id);
        self
    }

    /// Whether this department has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether `user_id` is the direct manager of this department.
    pub fn is_managed_by(&self, user_id: Uuid) -> bool {
        self.manager_id == Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_builder() {
        let org_id = Uuid::now_v7();
        let manager = Uuid::now_v7();
        let parent = Department::new(org_id, "Ops");
        let child = Department::new(org_id, "Ops / Night")
            .with_parent(parent.id)
            .with_manager(manager);

        assert!(parent.is_root());
        assert!(!child.is_root());
        assert!(child.is_managed_by(manager));
        assert!(!parent.is_managed_by(manager));
        assert_eq!(child.organization_id, org_id);
    }
}
