//! # Permissions
//!
//! A permission pairs a resource type with an action. Permission sets are the
//! output of enumeration: everything a user may do inside one organization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::actions::PermissionAction;
use crate::resources::ResourceType;

/// A permission is a combination of resource type and action.
///
/// # Example
///
/// ```
/// use authz_rbac::{Permission, PermissionAction, ResourceType};
///
/// let perm = Permission::new(ResourceType::Form, PermissionAction::Edit);
/// assert_eq!(perm.to_string(), "form:edit");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Permission {
    /// The resource type this permission applies to.
    pub resource: ResourceType,
    /// The action allowed on the resource.
    pub action: PermissionAction,
}

impl Permission {
    /// Create a new permission.
    pub fn new(resource: ResourceType, action: PermissionAction) -> Self {
        Self { resource, action }
    }

    /// Parse from string (e.g., "form:edit").
    ///
    /// # Returns
    ///
    /// `Some(Permission)` if both halves name a known resource type and
    /// action, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use authz_rbac::{Permission, PermissionAction, ResourceType};
    ///
    /// let perm = Permission::from_string("workflow:manage").unwrap();
    /// assert_eq!(perm.resource, ResourceType::Workflow);
    /// assert_eq!(perm.action, PermissionAction::Manage);
    /// assert!(Permission::from_string("workflow").is_none());
    /// ```
    pub fn from_string(s: &str) -> Option<Self> {
        let (resource, action) = s.split_once(':')?;
        Some(Self {
            resource: ResourceType::parse(resource)?,
            action: PermissionAction::parse(action)?,
        })
    }

    /// Check if holding this permission also covers `other`.
    ///
    /// Resource types must match exactly; the action must imply the other.
    pub fn covers(&self, other: &Permission) -> bool {
        self.resource == other.resource && self.action.implies(other.action)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.resource.as_str(), self.action.as_str())
    }
}

/// A deduplicated set of permissions.
///
/// Ordered so enumeration output is stable across calls.
///
/// # Example
///
/// ```
/// use authz_rbac::{Permission, PermissionAction, PermissionSet, ResourceType};
///
/// let mut set = PermissionSet::new();
/// set.add(Permission::new(ResourceType::Form, PermissionAction::Edit));
/// set.add(Permission::new(ResourceType::Form, PermissionAction::Edit));
///
/// assert_eq!(set.len(), 1);
/// assert!(set.grants(&Permission::new(ResourceType::Form, PermissionAction::View)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    permissions: BTreeSet<Permission>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: BTreeSet::new(),
        }
    }

    /// Add a permission to the set.
    ///
    /// # Returns
    ///
    /// `true` if the permission was not already present.
    pub fn add(&mut self, permission: Permission) -> bool {
        self.permissions.insert(permission)
    }

    /// Add multiple permissions to the set.
    pub fn add_all<I>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = Permission>,
    {
        self.permissions.extend(permissions);
    }

    /// Remove a permission from the set.
    pub fn remove(&mut self, permission: &Permission) -> bool {
        self.permissions.remove(permission)
    }

    /// Check if the set contains exactly this permission.
    pub fn contains(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Check if the set grants a permission, directly or through a stronger
    /// action on the same resource type (e.g. `form:manage` grants `form:view`).
    pub fn grants(&self, permission: &Permission) -> bool {
        self.permissions.iter().any(|held| held.covers(permission))
    }

    /// Iterate over the permissions in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// Merge another permission set into this one.
    pub fn merge(&mut self, other: &PermissionSet) {
        self.permissions.extend(other.permissions.iter().copied());
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Render every permission as `resource:action`.
    pub fn to_strings(&self) -> Vec<String> {
        self.permissions.iter().map(|p| p.to_string()).collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a Permission;
    type IntoIter = std::collections::btree_set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.permissions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_display_and_parse() {
        let perm = Permission::new(ResourceType::Department, PermissionAction::Manage);
        assert_eq!(perm.to_string(), "department:manage");
        assert_eq!(Permission::from_string("department:manage"), Some(perm));
        assert_eq!(Permission::from_string("departments:MANAGE"), Some(perm));
        assert_eq!(Permission::from_string("department:admin"), None);
        assert_eq!(Permission::from_string("team:view"), None);
    }

    #[test]
    fn test_covers_requires_same_resource() {
        let manage_form = Permission::new(ResourceType::Form, PermissionAction::Manage);
        assert!(manage_form.covers(&Permission::new(ResourceType::Form, PermissionAction::Delete)));
        assert!(!manage_form.covers(&Permission::new(ResourceType::Workflow, PermissionAction::View)));
    }

    #[test]
    fn test_permission_set_dedup() {
        let set: PermissionSet = [
            Permission::new(ResourceType::Form, PermissionAction::View),
            Permission::new(ResourceType::Form, PermissionAction::View),
            Permission::new(ResourceType::Workflow, PermissionAction::View),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 2);
        assert!(set.contains(&Permission::new(ResourceType::Form, PermissionAction::View)));
        assert!(!set.contains(&Permission::new(ResourceType::Form, PermissionAction::Edit)));
    }

    #[test]
    fn test_permission_set_grants_implied() {
        let mut set = PermissionSet::new();
        set.add(Permission::new(ResourceType::Workflow, PermissionAction::Edit));

        assert!(set.grants(&Permission::new(ResourceType::Workflow, PermissionAction::View)));
        assert!(!set.grants(&Permission::new(ResourceType::Workflow, PermissionAction::Delete)));
        // Exact membership stays literal
        assert!(!set.contains(&Permission::new(ResourceType::Workflow, PermissionAction::View)));
    }

    #[test]
    fn test_permission_set_merge_and_remove() {
        let mut a = PermissionSet::new();
        a.add(Permission::new(ResourceType::Form, PermissionAction::View));

        let mut b = PermissionSet::new();
        b.add(Permission::new(ResourceType::Department, PermissionAction::Manage));

        a.merge(&b);
        assert_eq!(a.len(), 2);

        assert!(a.remove(&Permission::new(ResourceType::Form, PermissionAction::View)));
        assert!(!a.remove(&Permission::new(ResourceType::Form, PermissionAction::View)));
        assert_eq!(a.to_strings(), vec!["department:manage".to_string()]);
    }
}
