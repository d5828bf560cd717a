//! User profile department assignment
//!
//! Separate from organization membership: a profile records which department
//! a user works in and the role they hold there.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role a user holds inside their assigned department.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentRole {
    /// Read-only participant
    Viewer,
    /// Regular department member
    Member,
    /// Can edit department content
    Editor,
    /// Runs the department
    Manager,
}

impl DepartmentRole {
    /// Parse from string representation (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use authz_org::DepartmentRole;
    ///
    /// assert_eq!(DepartmentRole::parse("manager"), Some(DepartmentRole::Manager));
    /// assert_eq!(DepartmentRole::parse("owner"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "viewer" => Some(Self::Viewer),
            "member" => Some(Self::Member),
            "editor" => Some(Self::Editor),
            "manager" => Some(Self::Manager),
            _ => None,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Member => "member",
            Self::Editor => "editor",
            Self::Manager => "manager",
        }
    }
}

impl std::fmt::Display for DepartmentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile-level department fields of a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    /// User ID
    pub user_id: Uuid,

    /// Assigned department
    pub department_id: Option<Uuid>,

    /// Role within the assigned department
    pub department_role: Option<DepartmentRole>,

    /// Last change to the department fields
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// A profile without a department.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            department_id: None,
            department_role: None,
            updated_at: Utc::now(),
        }
    }

    /// Assign the user to a department with a role.
    pub fn assign(&mut self, department_id: Uuid, role: DepartmentRole) {
        self.department_id = Some(department_id);
        self.department_role = Some(role);
        self.updated_at = Utc::now();
    }

    /// Remove any department assignment.
    pub fn clear_department(&mut self) {
        self.department_id = None;
        self.department_role = None;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_and_clear() {
        let mut profile = UserProfile::new(Uuid::now_v7());
        let dept = Uuid::now_v7();

        profile.assign(dept, DepartmentRole::Editor);
        assert_eq!(profile.department_id, Some(dept));
        assert_eq!(profile.department_role, Some(DepartmentRole::Editor));

        profile.clear_department();
        assert!(profile.department_id.is_none());
        assert!(profile.department_role.is_none());
    }

    #[test]
    fn test_department_role_parse() {
        assert_eq!(DepartmentRole::parse("Viewer"), Some(DepartmentRole::Viewer));
        assert_eq!(DepartmentRole::parse("editor"), Some(DepartmentRole::Editor));
        assert_eq!(DepartmentRole::parse("admin"), None);
    }
}
