//! # Authz Organization Records
//!
//! This crate provides the persisted records of organization-scoped
//! authorization, shared by the engine and by the collaborators that feed it.
//!
//! ## Overview
//!
//! The authz-org crate handles:
//! - **Organizations**: tenant identities
//! - **Memberships**: one role per (user, organization)
//! - **Departments**: the per-organization tree with optional managers
//! - **Profiles**: a user's department assignment and department role
//! - **Resource records**: which organization owns a workflow or form
//! - **Audit entries**: append-only history of membership changes
//!
//! ## Architecture
//!
//! ```text
//! User
//!   ├─ Membership ─→ Organization
//!   │                   ├─ Department ─→ parent Department ...
//!   │                   └─ ResourceRecord (workflow, form)
//!   └─ UserProfile ─→ Department
//!
//! AuditLogEntry (outlives everything above)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use authz_org::{Department, Membership, Organization};
//! use authz_rbac::Role;
//! use uuid::Uuid;
//!
//! let owner_id = Uuid::now_v7();
//! let org = Organization::new("Acme Corp", owner_id);
//! let membership = Membership::new(org.id, owner_id, Role::Owner);
//! let sales = Department::new(org.id, "Sales").with_manager(owner_id);
//! assert!(sales.is_managed_by(membership.user_id));
//! ```

pub mod audit;
pub mod department;
pub mod membership;
pub mod organization;
pub mod profile;
pub mod resource;

// Re-export main types for convenience
pub use audit::{AuditLogEntry, AuditOperation, MEMBERSHIP_TABLE};
pub use department::Department;
pub use membership::{Membership, MembershipKey};
pub use organization::Organization;
pub use profile::{DepartmentRole, UserProfile};
pub use resource::ResourceRecord;
