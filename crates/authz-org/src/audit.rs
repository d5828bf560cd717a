//! Audit log domain model
//!
//! Every change to a membership row produces one append-only entry. Entries
//! are never edited or removed, and they outlive the memberships they
//! describe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use authz_rbac::Role;

/// Table name recorded for membership mutations.
pub const MEMBERSHIP_TABLE: &str = "organization_members";

/// Kind of row mutation an entry records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuditOperation {
    /// A membership row was created
    Insert,
    /// A membership role changed
    Update,
    /// A membership row was removed
    Delete,
}

impl AuditOperation {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// One immutable audit record.
///
/// Role values follow the operation kind:
///
/// | operation | old_role | new_role |
/// |-----------|----------|----------|
/// | insert    | `None`   | new      |
/// | update    | previous | new      |
/// | delete    | previous | `None`   |
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditLogEntry {
    /// Entry ID (UUID v7, so ids sort by creation)
    pub id: Uuid,

    /// User whose membership changed
    pub user_id: Uuid,

    /// What happened to the row
    pub operation: AuditOperation,

    /// Table the mutation touched
    pub table_name: String,

    /// Organization the membership belongs to
    pub organization_id: Uuid,

    /// Role before the change
    pub old_role: Option<Role>,

    /// Role after the change
    pub new_role: Option<Role>,

    /// Principal who performed the change
    pub actor_id: Uuid,

    /// Server-assigned time of the change
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Entry for a newly created membership.
    ///
    /// # Examples
    ///
    /// ```
    /// use uuid::Uuid;
    /// use authz_org::{AuditLogEntry, AuditOperation};
    /// use authz_rbac::Role;
    ///
    /// let entry = AuditLogEntry::inserted(Uuid::now_v7(), Uuid::now_v7(), Role::Member, Uuid::now_v7());
    /// assert_eq!(entry.operation, AuditOperation::Insert);
    /// assert_eq!(entry.old_role, None);
    /// assert_eq!(entry.new_role, Some(Role::Member));
    /// ```
    pub fn inserted(user_id: Uuid, organization_id: Uuid, role: Role, actor_id: Uuid) -> Self {
        Self::build(user_id, organization_id, AuditOperation::Insert, None, Some(role), actor_id)
    }

    /// Entry for a role change.
    pub fn updated(
        user_id: Uuid,
        organization_id: Uuid,
        old_role: Role,
        new_role: Role,
        actor_id: Uuid,
    ) -> Self {
        Self::build(
            user_id,
            organization_id,
            AuditOperation::Update,
            Some(old_role),
            Some(new_role),
            actor_id,
        )
    }

    /// Entry for a removed membership.
    pub fn deleted(user_id: Uuid, organization_id: Uuid, old_role: Role, actor_id: Uuid) -> Self {
        Self::build(user_id, organization_id, AuditOperation::Delete, Some(old_role), None, actor_id)
    }

    fn build(
        user_id: Uuid,
        organization_id: Uuid,
        operation: AuditOperation,
        old_role: Option<Role>,
        new_role: Option<Role>,
        actor_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            operation,
            table_name: MEMBERSHIP_TABLE.to_string(),
            organization_id,
            old_role,
            new_role,
            actor_id,
            created_at: Utc::now(),
        }
    }

    /// Whether the role columns agree with the operation kind.
    pub fn is_consistent(&self) -> bool {
        match self.operation {
            AuditOperation::Insert => self.old_role.is_none() && self.new_role.is_some(),
            AuditOperation::Update => self.old_role.is_some() && self.new_role.is_some(),
            AuditOperation::Delete => self.old_role.is_some() && self.new_role.is_none(),
        }
    }
}
