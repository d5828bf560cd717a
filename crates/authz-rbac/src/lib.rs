//! # Authz RBAC (Role-Based Access Control)
//!
//! This crate provides the static half of organization-scoped authorization:
//! the closed vocabularies and the role-permission matrix.
//!
//! ## Overview
//!
//! The authz-rbac crate handles:
//! - **Roles**: owner, admin, editor, member, viewer
//! - **Resources**: organization, department, workflow, form
//! - **Actions**: view, edit, delete, manage
//! - **Permissions**: Resource + Action combinations and sets of them
//! - **Matrix**: role x action decisions and per-role baseline grants
//!
//! ## Architecture
//!
//! ```text
//! Permission = Resource + Action
//!
//! Examples:
//!   "form:edit"          - Edit forms in the organization
//!   "department:manage"  - Manage departments
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use authz_rbac::{matrix, Permission, PermissionAction, ResourceType, Role};
//!
//! assert!(matrix::allows(Some(Role::Admin), PermissionAction::Delete));
//!
//! let grants = matrix::baseline_grants(Role::Editor);
//! assert!(grants.contains(&Permission::new(ResourceType::Workflow, PermissionAction::Edit)));
//! ```
//!
//! ## Fail-closed
//!
//! Nothing in this crate returns an error. Unknown names parse to `None` and
//! a missing role is denied every action.

pub mod actions;
pub mod matrix;
pub mod permissions;
pub mod resources;
pub mod roles;

// Re-export main types for convenience
pub use actions::PermissionAction;
pub use permissions::{Permission, PermissionSet};
pub use resources::ResourceType;
pub use roles::Role;
