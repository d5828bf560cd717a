//! Audit logging for membership mutations
//!
//! The write path builds each entry, lets the audit hook vet it, and appends
//! it to the transaction's audit table itself, before the row change. An
//! entry that is rejected fails the whole mutation, so no membership change
//! ever commits without its entry.

use uuid::Uuid;

use authz_org::{AuditLogEntry, Membership};

use crate::error::{AuthzError, AuthzResult};

/// Append-only table of audit entries.
///
/// There is no way to edit or remove an entry once appended.
#[derive(Debug, Clone, Default)]
pub struct AuditTable {
    entries: Vec<AuditLogEntry>,
}

impl AuditTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn append(&mut self, entry: AuditLogEntry) {
        self.entries.push(entry);
    }

    /// All entries in append order.
    pub fn entries(&self) -> &[AuditLogEntry] {
        &self.entries
    }

    /// Entries for one organization, in append order.
    pub fn for_organization(&self, organization_id: Uuid) -> Vec<AuditLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.organization_id == organization_id)
            .cloned()
            .collect()
    }

    /// Entries about one user, in append order.
    pub fn for_user(&self, user_id: Uuid) -> Vec<AuditLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hook that vets membership audit entries.
///
/// The transaction appends every entry itself once the hook accepts it; the
/// hook only sees the entry. Returning an error aborts the mutation that
/// produced the entry.
pub trait AuditLogger: Send + Sync {
    /// Accept or reject one entry before it is appended.
    fn record(&self, entry: &AuditLogEntry) -> AuthzResult<()>;
}

/// Default policy for entries entering the audit table.
#[derive(Debug, Clone, Copy)]
pub struct TableAuditLogger {
    require_actor: bool,
}

impl TableAuditLogger {
    /// Create a logger.
    ///
    /// With `require_actor` set, entries whose actor is the nil (system)
    /// principal are rejected.
    pub fn new(require_actor: bool) -> Self {
        Self { require_actor }
    }
}

impl Default for TableAuditLogger {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AuditLogger for TableAuditLogger {
    fn record(&self, entry: &AuditLogEntry) -> AuthzResult<()> {
        if self.require_actor && entry.actor_id.is_nil() {
            return Err(AuthzError::AuditWriteFailure(
                "audit entry has no acting principal".to_string(),
            ));
        }
        Ok(())
    }
}

/// Run `logger` over `entry` and append it to `table` when accepted.
///
/// Entries whose role columns disagree with their operation are rejected
/// whatever the logger says.
pub(crate) fn append_audited(
    logger: &dyn AuditLogger,
    table: &mut AuditTable,
    entry: AuditLogEntry,
) -> AuthzResult<()> {
    if !entry.is_consistent() {
        return Err(AuthzError::AuditWriteFailure(format!(
            "role columns do not match {} operation",
            entry.operation.as_str()
        )));
    }
    logger.record(&entry)?;
    table.append(entry);
    Ok(())
}

/// Outcome of a membership write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipChange {
    /// A new membership row was created
    Inserted(Membership),
    /// An existing membership changed role
    Updated {
        /// Row after the change
        membership: Membership,
        /// Role before the change
        previous: authz_rbac::Role,
    },
    /// A membership row was deleted
    Removed(Membership),
    /// Nothing to write (same role, or no row to remove)
    Unchanged,
}

impl MembershipChange {
    /// Whether a row was written.
    pub fn is_change(&self) -> bool {
        !matches!(self, MembershipChange::Unchanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authz_rbac::Role;

    struct AcceptAll;

    impl AuditLogger for AcceptAll {
        fn record(&self, _entry: &AuditLogEntry) -> AuthzResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_accepted_entry_is_appended() {
        let mut table = AuditTable::new();
        let org = Uuid::now_v7();

        append_audited(
            &TableAuditLogger::default(),
            &mut table,
            AuditLogEntry::inserted(Uuid::now_v7(), org, Role::Member, Uuid::now_v7()),
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.for_organization(org).len(), 1);
        assert!(table.for_organization(Uuid::now_v7()).is_empty());
    }

    #[test]
    fn test_permissive_logger_still_appends() {
        let mut table = AuditTable::new();
        append_audited(
            &AcceptAll,
            &mut table,
            AuditLogEntry::deleted(Uuid::now_v7(), Uuid::now_v7(), Role::Editor, Uuid::now_v7()),
        )
        .unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_inconsistent_entry_rejected() {
        let mut table = AuditTable::new();
        let mut entry =
            AuditLogEntry::inserted(Uuid::now_v7(), Uuid::now_v7(), Role::Member, Uuid::now_v7());
        entry.new_role = None;

        let err = append_audited(&AcceptAll, &mut table, entry).unwrap_err();
        assert!(matches!(err, AuthzError::AuditWriteFailure(_)));
        assert!(table.is_empty());
    }

    #[test]
    fn test_system_actor_policy() {
        let entry = AuditLogEntry::deleted(Uuid::now_v7(), Uuid::now_v7(), Role::Editor, Uuid::nil());

        assert!(TableAuditLogger::new(true).record(&entry).is_err());
        assert!(TableAuditLogger::new(false).record(&entry).is_ok());
    }
}
