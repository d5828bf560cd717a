//! Organization domain model
//!
//! Organizations are the tenant boundary. For authorization purposes an
//! organization is little more than an identity that memberships,
//! departments and collaborator records point at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An organization represents a tenant.
///
/// # Architecture
///
/// ```text
/// Organization
///   ├─ Members (via Membership)
///   ├─ Departments (tree)
///   └─ Workflows / Forms (via ResourceRecord)
/// ```
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use authz_org::Organization;
///
/// let creator = Uuid::now_v7();
/// let org = Organization::new("Acme Corp", creator);
/// assert_eq!(org.name, "Acme Corp");
/// assert_eq!(org.created_by, creator);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organization {
    /// Unique identifier for the organization
    pub id: Uuid,

    /// Human-readable name
    pub name: String,

    /// User who created the organization and became its first owner
    pub created_by: Uuid,

    /// When the organization was created
    pub created_at: DateTime<Utc>,
}

impl Organization {
    /// Creates a new organization with a freshly generated UUID v7 id.
    pub fn new(name: impl Into<String>, created_by: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            created_by,
            created_at: Utc::now(),
        }
    }

    /// Use a caller-provided id instead of a generated one.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}
