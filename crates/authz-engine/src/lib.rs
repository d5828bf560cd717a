//! # Authz Engine
//!
//! Organization-scoped authorization: permission decisions, permission
//! enumeration, delegated department authority and an audited membership
//! mutation API.
//!
//! ## Overview
//!
//! The authz-engine crate handles:
//! - **Decisions**: `has_permission` for one (resource, action) pair
//! - **Enumeration**: every grant a user holds in an organization
//! - **Department hierarchy**: managers hold authority over their subtree
//! - **Membership gateway**: self-guarded add/remove/assign operations
//! - **Audit**: one immutable entry per membership change, in the same
//!   transaction as the change
//!
//! ## Decision rules
//!
//! 1. Resolve the organization owning the resource. Unknown resource → deny.
//! 2. Look up the requester's membership role there. No membership → deny.
//! 3. On departments, a `member` or `editor` who manages the department or
//!    any ancestor is treated as `editor`.
//! 4. Apply the role-permission matrix.
//!
//! ## Usage
//!
//! ```rust
//! use authz_engine::{AuthzEngine, EngineConfig, MemoryStore, Principal};
//! use authz_rbac::{PermissionAction, ResourceType, Role};
//! use uuid::Uuid;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let engine = AuthzEngine::new(MemoryStore::new(), EngineConfig::default());
//! let owner = Principal::user(Uuid::now_v7());
//! let org = engine.create_organization("Acme", &owner).await?;
//!
//! let alice = Uuid::now_v7();
//! engine.add_user_to_organization(&owner, alice, org.id, Role::Editor).await?;
//!
//! let alice = Principal::user(alice);
//! assert!(engine.has_permission(&alice, ResourceType::Organization, org.id, PermissionAction::View).await);
//! assert!(!engine.has_permission(&alice, ResourceType::Organization, org.id, PermissionAction::Manage).await);
//! # Ok::<(), authz_engine::AuthzError>(())
//! # }).unwrap();
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod enumerator;
pub mod error;
pub mod gateway;
pub mod hierarchy;
pub mod owner;
pub mod principal;
pub mod resolver;
pub mod state;
pub mod store;
pub mod transaction;

// Re-export main types for convenience
pub use audit::{AuditLogger, AuditTable, MembershipChange, TableAuditLogger};
pub use config::{ConfigError, EngineConfig};
pub use engine::AuthzEngine;
pub use enumerator::PermissionEnumerator;
pub use error::{AuthzError, AuthzResult};
pub use hierarchy::DepartmentHierarchy;
pub use owner::{owner_for, OwningOrganization};
pub use principal::Principal;
pub use resolver::PermissionResolver;
pub use state::{AuthzState, StateView};
pub use store::{AuthzStore, MemoryStore, Snapshot};
pub use transaction::Transaction;
