//! The principal a request is evaluated for.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller of an engine operation.
///
/// Collaborators build this from their own session/claims handling; the
/// engine only needs the user id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Principal {
    /// User ID of the caller
    pub user_id: Uuid,
}

impl Principal {
    /// A principal acting as the given user.
    pub fn user(user_id: Uuid) -> Self {
        Self { user_id }
    }

    /// The internal system principal (nil id).
    ///
    /// Holds no memberships, so every permission check for it is denied.
    pub fn system() -> Self {
        Self { user_id: Uuid::nil() }
    }

    /// Whether this is the system principal.
    pub fn is_system(&self) -> bool {
        self.user_id.is_nil()
    }
}

impl From<Uuid> for Principal {
    fn from(user_id: Uuid) -> Self {
        Self::user(user_id)
    }
}
