//! Ownership pointers for collaborator-owned records
//!
//! Workflows and forms live in their own record stores. The authorization
//! engine only needs to know which organization owns each of them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use authz_rbac::ResourceType;

/// The owning organization of one collaborator record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ResourceRecord {
    /// Kind of record
    pub resource_type: ResourceType,

    /// Record ID in the collaborator's store
    pub resource_id: Uuid,

    /// Owning organization
    pub organization_id: Uuid,
}

impl ResourceRecord {
    /// Create an ownership pointer.
    pub fn new(resource_type: ResourceType, resource_id: Uuid, organization_id: Uuid) -> Self {
        Self {
            resource_type,
            resource_id,
            organization_id,
        }
    }

    /// Lookup key of this record.
    pub fn key(&self) -> (ResourceType, Uuid) {
        (self.resource_type, self.resource_id)
    }
}
