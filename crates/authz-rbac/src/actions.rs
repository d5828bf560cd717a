//! # Actions
//!
//! Defines the closed set of actions a requester can ask to perform on a
//! resource. The decision logic only ever understands these four.

use serde::{Deserialize, Serialize};

/// Actions that can be performed on resources.
///
/// Actions are ordered by the level of access they represent:
/// - **View**: Read resource data
/// - **Edit**: Modify existing resource data
/// - **Delete**: Remove resource instances
/// - **Manage**: Administer the resource, its members and settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    /// View/read resource.
    View,

    /// Edit existing resource.
    Edit,

    /// Delete resource.
    Delete,

    /// Manage resource settings and membership.
    Manage,
}

impl PermissionAction {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionAction::View => "view",
            PermissionAction::Edit => "edit",
            PermissionAction::Delete => "delete",
            PermissionAction::Manage => "manage",
        }
    }

    /// Parse action from string representation.
    ///
    /// Parsing is case-insensitive but strict: only the four canonical names
    /// are accepted, anything else is `None` and callers must deny.
    ///
    /// # Example
    ///
    /// ```
    /// use authz_rbac::actions::PermissionAction;
    ///
    /// assert_eq!(PermissionAction::parse("view"), Some(PermissionAction::View));
    /// assert_eq!(PermissionAction::parse("MANAGE"), Some(PermissionAction::Manage));
    /// assert_eq!(PermissionAction::parse("read"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "view" => Some(PermissionAction::View),
            "edit" => Some(PermissionAction::Edit),
            "delete" => Some(PermissionAction::Delete),
            "manage" => Some(PermissionAction::Manage),
            _ => None,
        }
    }

    /// Get all actions, weakest first.
    pub fn all() -> [Self; 4] {
        [
            PermissionAction::View,
            PermissionAction::Edit,
            PermissionAction::Delete,
            PermissionAction::Manage,
        ]
    }

    /// Check if this action implies another action.
    ///
    /// Actions form a chain: `Manage` implies `Delete`, which implies `Edit`,
    /// which implies `View`. Every action implies itself.
    ///
    /// # Example
    ///
    /// ```
    /// use authz_rbac::actions::PermissionAction;
    ///
    /// assert!(PermissionAction::Manage.implies(PermissionAction::View));
    /// assert!(PermissionAction::Edit.implies(PermissionAction::View));
    /// assert!(!PermissionAction::View.implies(PermissionAction::Edit));
    /// ```
    pub fn implies(&self, other: PermissionAction) -> bool {
        *self >= other
    }

    /// Check if this is a read-only action.
    pub fn is_read_only(&self) -> bool {
        matches!(self, PermissionAction::View)
    }
}

impl std::fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!(PermissionAction::parse("view"), Some(PermissionAction::View));
        assert_eq!(PermissionAction::parse("Edit"), Some(PermissionAction::Edit));
        assert_eq!(PermissionAction::parse(" delete "), Some(PermissionAction::Delete));
        assert_eq!(PermissionAction::parse("manage"), Some(PermissionAction::Manage));

        // No aliases: unknown strings must fail closed
        assert_eq!(PermissionAction::parse("read"), None);
        assert_eq!(PermissionAction::parse("write"), None);
        assert_eq!(PermissionAction::parse(""), None);
    }

    #[test]
    fn test_action_as_str_roundtrip() {
        for action in PermissionAction::all() {
            assert_eq!(PermissionAction::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn test_action_implies() {
        assert!(PermissionAction::Manage.implies(PermissionAction::Delete));
        assert!(PermissionAction::Delete.implies(PermissionAction::Edit));
        assert!(PermissionAction::Edit.implies(PermissionAction::View));
        assert!(PermissionAction::View.implies(PermissionAction::View));

        assert!(!PermissionAction::View.implies(PermissionAction::Edit));
        assert!(!PermissionAction::Edit.implies(PermissionAction::Delete));
        assert!(!PermissionAction::Delete.implies(PermissionAction::Manage));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PermissionAction::Manage).unwrap();
        assert_eq!(json, "\"manage\"");
    }
}
