//! Membership mutation gateway.
//!
//! The three self-guarded mutations. Each one opens a transaction, checks the
//! caller's `manage` permission against that transaction, writes, and commits.
//! An unauthorized caller gets `Ok(false)` and nothing is written; an error
//! means the transaction was abandoned.

use tracing::{info, warn};
use uuid::Uuid;

use authz_org::DepartmentRole;
use authz_rbac::{PermissionAction, ResourceType, Role};

use crate::engine::AuthzEngine;
use crate::error::AuthzResult;
use crate::principal::Principal;
use crate::resolver::PermissionResolver;
use crate::state::StateView;
use crate::store::AuthzStore;
use crate::transaction::Transaction;

impl<S: AuthzStore> AuthzEngine<S> {
    fn can_manage_organization(&self, tx: &Transaction, caller: &Principal, organization_id: Uuid) -> bool {
        PermissionResolver::new(&**tx, self.config.max_department_depth).has_permission(
            ResourceType::Organization,
            organization_id,
            PermissionAction::Manage,
            caller.user_id,
        )
    }

    /// Add a user to an organization, or change their role.
    ///
    /// # Returns
    ///
    /// `Ok(true)` once the membership holds `role`, `Ok(false)` when the
    /// caller lacks `manage` on the organization.
    pub async fn add_user_to_organization(
        &self,
        caller: &Principal,
        user_id: Uuid,
        organization_id: Uuid,
        role: Role,
    ) -> AuthzResult<bool> {
        let mut tx = self.begin().await?;
        if !self.can_manage_organization(&tx, caller, organization_id) {
            warn!(
                caller_id = %caller.user_id,
                user_id = %user_id,
                organization_id = %organization_id,
                "add to organization denied"
            );
            return Ok(false);
        }

        let change = tx.upsert_membership(
            self.audit.as_ref(),
            caller.user_id,
            user_id,
            organization_id,
            role,
        )?;
        if change.is_change() {
            self.store.commit(tx).await?;
            info!(
                caller_id = %caller.user_id,
                user_id = %user_id,
                organization_id = %organization_id,
                role = %role,
                "membership written"
            );
        }
        Ok(true)
    }

    /// Remove a user from an organization.
    ///
    /// # Returns
    ///
    /// `Ok(true)` once no membership remains, `Ok(false)` when the caller
    /// lacks `manage` on the organization.
    pub async fn remove_user_from_organization(
        &self,
        caller: &Principal,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> AuthzResult<bool> {
        let mut tx = self.begin().await?;
        if !self.can_manage_organization(&tx, caller, organization_id) {
            warn!(
                caller_id = %caller.user_id,
                user_id = %user_id,
                organization_id = %organization_id,
                "remove from organization denied"
            );
            return Ok(false);
        }

        let change =
            tx.remove_membership(self.audit.as_ref(), caller.user_id, user_id, organization_id)?;
        if change.is_change() {
            self.store.commit(tx).await?;
            info!(
                caller_id = %caller.user_id,
                user_id = %user_id,
                organization_id = %organization_id,
                "membership removed"
            );
        }
        Ok(true)
    }

    /// Assign a user to a department with a department-scoped role.
    ///
    /// # Returns
    ///
    /// `Ok(false)` when the department does not exist or the caller lacks
    /// `manage` on its organization.
    pub async fn assign_department_permission(
        &self,
        caller: &Principal,
        user_id: Uuid,
        department_id: Uuid,
        role: DepartmentRole,
    ) -> AuthzResult<bool> {
        let mut tx = self.begin().await?;
        let Some(organization_id) = tx.department(department_id).map(|d| d.organization_id) else {
            warn!(department_id = %department_id, "department assignment to unknown department");
            return Ok(false);
        };
        if !self.can_manage_organization(&tx, caller, organization_id) {
            warn!(
                caller_id = %caller.user_id,
                user_id = %user_id,
                department_id = %department_id,
                "department assignment denied"
            );
            return Ok(false);
        }

        tx.assign_department(user_id, department_id, role)?;
        self.store.commit(tx).await?;
        info!(
            caller_id = %caller.user_id,
            user_id = %user_id,
            department_id = %department_id,
            department_role = %role,
            "department assignment written"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::{AuthzEngine, EngineConfig, MemoryStore, Principal};
    use authz_org::DepartmentRole;
    use authz_rbac::Role;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_admin_adds_member() {
        let engine = AuthzEngine::new(MemoryStore::new(), EngineConfig::default());
        let owner = Principal::user(Uuid::now_v7());
        let org = engine.create_organization("Acme", &owner).await.unwrap();
        let user = Uuid::now_v7();

        assert!(engine
            .add_user_to_organization(&owner, user, org.id, Role::Member)
            .await
            .unwrap());
        assert_eq!(engine.membership_role(user, org.id).await, Some(Role::Member));
    }

    #[tokio::test]
    async fn test_unknown_department_assignment_denied() {
        let engine = AuthzEngine::new(MemoryStore::new(), EngineConfig::default());
        let owner = Principal::user(Uuid::now_v7());
        engine.create_organization("Acme", &owner).await.unwrap();

        assert!(!engine
            .assign_department_permission(&owner, Uuid::now_v7(), Uuid::now_v7(), DepartmentRole::Editor)
            .await
            .unwrap());
    }
}
