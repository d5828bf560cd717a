//! Organization roles
//!
//! A user holds exactly one role per organization. The absence of a role is
//! modeled as `Option::None` by callers, never as a variant, so it can not be
//! assigned by accident.

use serde::{Deserialize, Serialize};

/// User role within an organization.
///
/// Roles are ranked: Viewer < Member < Editor < Admin < Owner. The rank is
/// used for display and ordering only; what a role may do is decided by the
/// [`matrix`](crate::matrix), where Member and Viewer grant the same actions.
///
/// # Examples
///
/// ```
/// use authz_rbac::Role;
///
/// assert!(Role::Owner.is_admin());
/// assert!(!Role::Editor.is_admin());
/// assert!(Role::Editor > Role::Member);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Read-only access to organization resources
    Viewer = 0,

    /// Regular member; read-only unless elevated by department management
    Member = 1,

    /// Can edit forms and workflows
    Editor = 2,

    /// Can manage the organization and its members
    Admin = 3,

    /// Full organization control
    Owner = 4,
}

impl Role {
    /// Check if this role has admin privileges.
    ///
    /// # Returns
    ///
    /// `true` for Admin and Owner roles
    pub fn is_admin(&self) -> bool {
        *self >= Role::Admin
    }

    /// Parse role from string representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use authz_rbac::Role;
    ///
    /// assert_eq!(Role::parse("admin"), Some(Role::Admin));
    /// assert_eq!(Role::parse("MEMBER"), Some(Role::Member));
    /// assert_eq!(Role::parse("none"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "viewer" => Some(Self::Viewer),
            "member" => Some(Self::Member),
            "editor" => Some(Self::Editor),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Member => "member",
            Self::Editor => "editor",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Viewer => "Viewer",
            Self::Member => "Member",
            Self::Editor => "Editor",
            Self::Admin => "Admin",
            Self::Owner => "Owner",
        }
    }

    /// Get all roles, lowest rank first.
    pub fn all() -> [Self; 5] {
        [
            Self::Viewer,
            Self::Member,
            Self::Editor,
            Self::Admin,
            Self::Owner,
        ]
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Member
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert!(Role::Owner > Role::Admin);
        assert!(Role::Admin > Role::Editor);
        assert!(Role::Editor > Role::Member);
        assert!(Role::Member > Role::Viewer);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("owner"), Some(Role::Owner));
        assert_eq!(Role::parse("Editor"), Some(Role::Editor));
        assert_eq!(Role::parse("guest"), None);
        assert_eq!(Role::parse(""), None);
        for role in Role::all() {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_is_admin() {
        assert!(Role::Owner.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Editor.is_admin());
        assert!(!Role::Member.is_admin());
        assert!(!Role::Viewer.is_admin());
    }
}
