//! Membership domain model
//!
//! A membership links one user to one organization with exactly one role.
//! The pair (user, organization) is unique; changing a role replaces the
//! previous one, and the history of changes lives in the audit log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use authz_rbac::Role;

/// Organization membership linking a user to an organization.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use authz_org::Membership;
/// use authz_rbac::Role;
///
/// let org_id = Uuid::now_v7();
/// let user_id = Uuid::now_v7();
/// let membership = Membership::new(org_id, user_id, Role::Editor);
/// assert_eq!(membership.role, Role::Editor);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Membership {
    /// Unique membership ID
    pub id: Uuid,

    /// Organization ID
    pub organization_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the organization
    pub role: Role,

    /// When the user joined
    pub joined_at: DateTime<Utc>,

    /// When the role last changed
    pub updated_at: DateTime<Utc>,

    /// Who added this user (if applicable)
    pub invited_by: Option<Uuid>,
}

impl Membership {
    /// Creates a new membership stamped with the current time.
    pub fn new(organization_id: Uuid, user_id: Uuid, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            organization_id,
            user_id,
            role,
            joined_at: now,
            updated_at: now,
            invited_by: None,
        }
    }

    /// Set who added this user.
    pub fn with_inviter(mut self, inviter_id: Uuid) -> Self {
        self.invited_by = Some(inviter_id);
        self
    }

    /// Replace the role, returning the previous one.
    pub fn change_role(&mut self, role: Role) -> Role {
        let previous = std::mem::replace(&mut self.role, role);
        self.updated_at = Utc::now();
        previous
    }

    /// The unique key of this membership.
    pub fn key(&self) -> MembershipKey {
        MembershipKey {
            user_id: self.user_id,
            organization_id: self.organization_id,
        }
    }
}

/// Unique key of a membership row: one role per (user, organization).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MembershipKey {
    /// User ID
    pub user_id: Uuid,
    /// Organization ID
    pub organization_id: Uuid,
}

impl MembershipKey {
    /// Build a key from its parts.
    pub fn new(user_id: Uuid, organization_id: Uuid) -> Self {
        Self {
            user_id,
            organization_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_creation() {
        let org_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let membership = Membership::new(org_id, user_id, Role::Viewer);

        assert_eq!(membership.organization_id, org_id);
        assert_eq!(membership.user_id, user_id);
        assert_eq!(membership.role, Role::Viewer);
        assert!(membership.invited_by.is_none());
        assert_eq!(membership.key(), MembershipKey::new(user_id, org_id));
    }

    #[test]
    fn test_change_role() {
        let mut membership = Membership::new(Uuid::now_v7(), Uuid::now_v7(), Role::Member);
        let previous = membership.change_role(Role::Admin);

        assert_eq!(previous, Role::Member);
        assert_eq!(membership.role, Role::Admin);
        assert!(membership.updated_at >= membership.joined_at);
    }

    #[test]
    fn test_with_inviter() {
        let inviter = Uuid::now_v7();
        let membership =
            Membership::new(Uuid::now_v7(), Uuid::now_v7(), Role::Member).with_inviter(inviter);
        assert_eq!(membership.invited_by, Some(inviter));
    }
}
