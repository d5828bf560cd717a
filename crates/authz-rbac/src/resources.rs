//! # Resource Types
//!
//! Defines the resource types the decision logic understands. The surrounding
//! platform may grow more record kinds, but authorization is only ever asked
//! about these four.

use serde::{Deserialize, Serialize};

/// Resource types that can have permissions checked against them.
///
/// - **Organization**: the tenant itself
/// - **Department**: a node in the organization's department tree
/// - **Workflow**: an approval workflow owned by an organization
/// - **Form**: a form definition owned by an organization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Organization resources.
    Organization,
    /// Department resources.
    Department,
    /// Workflow resources.
    Workflow,
    /// Form resources.
    Form,
}

impl ResourceType {
    /// Get the string representation of the resource type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Organization => "organization",
            ResourceType::Department => "department",
            ResourceType::Workflow => "workflow",
            ResourceType::Form => "form",
        }
    }

    /// Name of the table that stores rows of this type.
    pub fn table_name(&self) -> &'static str {
        match self {
            ResourceType::Organization => "organizations",
            ResourceType::Department => "departments",
            ResourceType::Workflow => "workflows",
            ResourceType::Form => "forms",
        }
    }

    /// Parse resource type from string representation.
    ///
    /// Accepts the singular name or the table name, case-insensitive.
    ///
    /// # Example
    ///
    /// ```
    /// use authz_rbac::resources::ResourceType;
    ///
    /// assert_eq!(ResourceType::parse("form"), Some(ResourceType::Form));
    /// assert_eq!(ResourceType::parse("departments"), Some(ResourceType::Department));
    /// assert_eq!(ResourceType::parse("document"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "organization" | "organizations" => Some(ResourceType::Organization),
            "department" | "departments" => Some(ResourceType::Department),
            "workflow" | "workflows" => Some(ResourceType::Workflow),
            "form" | "forms" => Some(ResourceType::Form),
            _ => None,
        }
    }

    /// Get all resource types.
    pub fn all() -> [Self; 4] {
        [
            ResourceType::Organization,
            ResourceType::Department,
            ResourceType::Workflow,
            ResourceType::Form,
        ]
    }

    /// Whether rows of this type are owned by an external record store.
    ///
    /// Organizations and departments are resolved by the engine itself;
    /// workflows and forms only register their owning organization.
    pub fn is_collaborator_owned(&self) -> bool {
        matches!(self, ResourceType::Workflow | ResourceType::Form)
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_parsing() {
        assert_eq!(ResourceType::parse("organization"), Some(ResourceType::Organization));
        assert_eq!(ResourceType::parse("Workflows"), Some(ResourceType::Workflow));
        assert_eq!(ResourceType::parse("FORM"), Some(ResourceType::Form));
        assert_eq!(ResourceType::parse("org"), None);
        assert_eq!(ResourceType::parse("submission"), None);
    }

    #[test]
    fn test_table_names_parse_back() {
        for resource in ResourceType::all() {
            assert_eq!(ResourceType::parse(resource.table_name()), Some(resource));
            assert_eq!(ResourceType::parse(resource.as_str()), Some(resource));
        }
    }

    #[test]
    fn test_collaborator_owned() {
        assert!(!ResourceType::Organization.is_collaborator_owned());
        assert!(!ResourceType::Department.is_collaborator_owned());
        assert!(ResourceType::Workflow.is_collaborator_owned());
        assert!(ResourceType::Form.is_collaborator_owned());
    }
}
