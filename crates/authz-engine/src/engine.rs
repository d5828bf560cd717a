//! Authorization engine facade
//!
//! `AuthzEngine` ties a store, the engine configuration and the audit hook
//! together. Read operations take one snapshot per call and never fail; if
//! no snapshot can be taken they deny. Write operations run inside a single
//! transaction and either fully commit or leave the store untouched.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use authz_org::{AuditLogEntry, Department, Organization, ResourceRecord, UserProfile};
use authz_rbac::{PermissionAction, PermissionSet, ResourceType, Role};

use crate::audit::{AuditLogger, TableAuditLogger};
use crate::config::EngineConfig;
use crate::enumerator::PermissionEnumerator;
use crate::error::AuthzResult;
use crate::hierarchy::DepartmentHierarchy;
use crate::principal::Principal;
use crate::resolver::PermissionResolver;
use crate::state::StateView;
use crate::store::{AuthzStore, MemoryStore, Snapshot};
use crate::transaction::Transaction;

/// Organization-scoped authorization engine.
///
/// # Examples
///
/// ```
/// use authz_engine::{AuthzEngine, EngineConfig, MemoryStore, Principal};
/// use authz_rbac::{PermissionAction, ResourceType};
/// use uuid::Uuid;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let engine = AuthzEngine::new(MemoryStore::new(), EngineConfig::default());
/// let owner = Principal::user(Uuid::now_v7());
/// let org = engine.create_organization("Acme", &owner).await.unwrap();
///
/// assert!(engine
///     .has_permission(&owner, ResourceType::Organization, org.id, PermissionAction::Manage)
///     .await);
/// # });
/// ```
pub struct AuthzEngine<S: AuthzStore = MemoryStore> {
    pub(crate) store: Arc<S>,
    pub(crate) config: EngineConfig,
    pub(crate) audit: Arc<dyn AuditLogger>,
}

impl<S: AuthzStore> std::fmt::Debug for AuthzEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthzEngine")
            .field("config", &self.config)
            .finish()
    }
}

impl<S: AuthzStore> Clone for AuthzEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
            audit: self.audit.clone(),
        }
    }
}

impl<S: AuthzStore> AuthzEngine<S> {
    /// Create an engine over `store` with the default table audit logger.
    pub fn new(store: S, config: EngineConfig) -> Self {
        let audit = Arc::new(TableAuditLogger::new(config.require_audit_actor));
        Self {
            store: Arc::new(store),
            config,
            audit,
        }
    }

    /// Create an engine configured from the environment.
    pub fn from_env(store: S) -> AuthzResult<Self> {
        Ok(Self::new(store, EngineConfig::from_env()?))
    }

    /// Replace the audit hook.
    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    async fn snapshot_or_deny(&self, operation: &'static str) -> Option<Snapshot> {
        match self.store.snapshot().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(operation, error = %e, "snapshot unavailable, denying");
                None
            }
        }
    }

    pub(crate) async fn begin(&self) -> AuthzResult<Transaction> {
        Ok(self
            .store
            .begin()
            .await?
            .with_depth_limit(self.config.max_department_depth))
    }

    // ------------------------------------------------------------------
    // Decisions
    // ------------------------------------------------------------------

    /// Whether `principal` may perform `action` on the resource.
    pub async fn has_permission(
        &self,
        principal: &Principal,
        resource_type: ResourceType,
        resource_id: Uuid,
        action: PermissionAction,
    ) -> bool {
        let Some(snapshot) = self.snapshot_or_deny("has_permission").await else {
            return false;
        };
        PermissionResolver::new(&*snapshot, self.config.max_department_depth).has_permission(
            resource_type,
            resource_id,
            action,
            principal.user_id,
        )
    }

    /// String form of [`has_permission`](Self::has_permission).
    ///
    /// Unknown resource types, malformed ids and unknown actions deny.
    pub async fn has_permission_named(
        &self,
        principal: &Principal,
        resource_type: &str,
        resource_id: &str,
        action: &str,
    ) -> bool {
        let Some(snapshot) = self.snapshot_or_deny("has_permission_named").await else {
            return false;
        };
        PermissionResolver::new(&*snapshot, self.config.max_department_depth)
            .has_permission_named(resource_type, resource_id, action, principal.user_id)
    }

    /// Every (resource type, action) grant `user_id` holds in the organization.
    pub async fn get_user_permissions(&self, user_id: Uuid, organization_id: Uuid) -> PermissionSet {
        let Some(snapshot) = self.snapshot_or_deny("get_user_permissions").await else {
            return PermissionSet::new();
        };
        PermissionEnumerator::new(&*snapshot, self.config.max_department_depth)
            .user_permissions(user_id, organization_id)
    }

    /// Whether `user_id` manages the department or one of its ancestors.
    pub async fn is_manager_or_above(&self, department_id: Uuid, user_id: Uuid) -> bool {
        let Some(snapshot) = self.snapshot_or_deny("is_manager_or_above").await else {
            return false;
        };
        DepartmentHierarchy::new(&*snapshot, self.config.max_department_depth)
            .is_manager_or_above(department_id, user_id)
    }

    /// The department and all departments below it.
    pub async fn all_descendants(&self, root_department_id: Uuid) -> BTreeSet<Uuid> {
        let Some(snapshot) = self.snapshot_or_deny("all_descendants").await else {
            return BTreeSet::new();
        };
        DepartmentHierarchy::new(&*snapshot, self.config.max_department_depth)
            .all_descendants(root_department_id)
    }

    /// Departments of the organization directly managed by `user_id`.
    pub async fn managed_departments(&self, organization_id: Uuid, user_id: Uuid) -> Vec<Uuid> {
        let Some(snapshot) = self.snapshot_or_deny("managed_departments").await else {
            return Vec::new();
        };
        DepartmentHierarchy::new(&*snapshot, self.config.max_department_depth)
            .managed_departments(organization_id, user_id)
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// Role of a user in an organization.
    pub async fn membership_role(&self, user_id: Uuid, organization_id: Uuid) -> Option<Role> {
        let snapshot = self.snapshot_or_deny("membership_role").await?;
        snapshot.membership_role(user_id, organization_id)
    }

    /// Look up a department.
    pub async fn department(&self, department_id: Uuid) -> Option<Department> {
        let snapshot = self.snapshot_or_deny("department").await?;
        snapshot.department(department_id).cloned()
    }

    /// Department assignment of a user.
    pub async fn profile(&self, user_id: Uuid) -> Option<UserProfile> {
        let snapshot = self.snapshot_or_deny("profile").await?;
        snapshot.profile(user_id).cloned()
    }

    /// Audit entries for an organization, in append order.
    pub async fn audit_log(&self, organization_id: Uuid) -> Vec<AuditLogEntry> {
        match self.snapshot_or_deny("audit_log").await {
            Some(snapshot) => snapshot.audit.for_organization(organization_id),
            None => Vec::new(),
        }
    }

    /// Audit entries about a user across organizations, in append order.
    pub async fn audit_log_for_user(&self, user_id: Uuid) -> Vec<AuditLogEntry> {
        match self.snapshot_or_deny("audit_log_for_user").await {
            Some(snapshot) => snapshot.audit.for_user(user_id),
            None => Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Provisioning
    // ------------------------------------------------------------------

    /// Create an organization owned by `owner`.
    ///
    /// The owner membership is written through the audited path with the
    /// owner as actor.
    pub async fn create_organization(
        &self,
        name: impl Into<String>,
        owner: &Principal,
    ) -> AuthzResult<Organization> {
        let organization = Organization::new(name, owner.user_id);
        let mut tx = self.begin().await?;
        tx.insert_organization(organization.clone())?;
        tx.upsert_membership(
            self.audit.as_ref(),
            owner.user_id,
            owner.user_id,
            organization.id,
            Role::Owner,
        )?;
        self.store.commit(tx).await?;

        info!(
            organization_id = %organization.id,
            owner_id = %owner.user_id,
            "organization created"
        );
        Ok(organization)
    }

    /// Delete an organization with its memberships, departments, profile
    /// assignments and resource records.
    pub async fn delete_organization(
        &self,
        actor: &Principal,
        organization_id: Uuid,
    ) -> AuthzResult<Organization> {
        let mut tx = self.begin().await?;
        let organization =
            tx.remove_organization(self.audit.as_ref(), actor.user_id, organization_id)?;
        self.store.commit(tx).await?;

        info!(
            organization_id = %organization_id,
            actor_id = %actor.user_id,
            "organization deleted"
        );
        Ok(organization)
    }

    /// Create a department.
    pub async fn create_department(
        &self,
        organization_id: Uuid,
        name: impl Into<String>,
        parent_id: Option<Uuid>,
        manager_id: Option<Uuid>,
    ) -> AuthzResult<Department> {
        let mut department = Department::new(organization_id, name);
        department.parent_id = parent_id;
        department.manager_id = manager_id;

        let mut tx = self.begin().await?;
        tx.insert_department(department.clone())?;
        self.store.commit(tx).await?;

        info!(
            department_id = %department.id,
            organization_id = %organization_id,
            "department created"
        );
        Ok(department)
    }

    /// Move a department under a new parent, or make it a root.
    pub async fn set_department_parent(
        &self,
        department_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> AuthzResult<Department> {
        let mut tx = self.begin().await?;
        let department = tx.set_department_parent(department_id, parent_id)?;
        self.store.commit(tx).await?;

        info!(department_id = %department_id, parent_id = ?parent_id, "department moved");
        Ok(department)
    }

    /// Set or clear a department's manager.
    pub async fn set_department_manager(
        &self,
        department_id: Uuid,
        manager_id: Option<Uuid>,
    ) -> AuthzResult<Department> {
        let mut tx = self.begin().await?;
        let department = tx.set_department_manager(department_id, manager_id)?;
        self.store.commit(tx).await?;

        info!(department_id = %department_id, manager_id = ?manager_id, "department manager set");
        Ok(department)
    }

    /// Record the owning organization of a workflow or form.
    pub async fn register_resource(
        &self,
        resource_type: ResourceType,
        resource_id: Uuid,
        organization_id: Uuid,
    ) -> AuthzResult<ResourceRecord> {
        let record = ResourceRecord::new(resource_type, resource_id, organization_id);
        let mut tx = self.begin().await?;
        tx.insert_resource(record)?;
        self.store.commit(tx).await?;
        Ok(record)
    }

    /// Forget a workflow or form. Returns whether a record existed.
    pub async fn unregister_resource(
        &self,
        resource_type: ResourceType,
        resource_id: Uuid,
    ) -> AuthzResult<bool> {
        let mut tx = self.begin().await?;
        let removed = tx.remove_resource(resource_type, resource_id).is_some();
        if removed {
            self.store.commit(tx).await?;
        }
        Ok(removed)
    }
}
