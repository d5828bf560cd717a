//! Error types for the authorization engine
//!
//! Read-path decisions never surface these: an unresolvable question is
//! answered with "deny". Errors only come out of write paths, where a caller
//! must learn that nothing was committed.

use thiserror::Error;
use uuid::Uuid;

use crate::config::ConfigError;

/// Authorization engine error types.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Referenced organization, department or record does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up
        entity: &'static str,
        /// Identifier that did not resolve
        id: Uuid,
    },

    /// Input outside the closed vocabularies or otherwise malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Write would break a structural invariant (e.g. a department cycle)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The audit record could not be written; the mutation was aborted
    #[error("Audit write failed: {0}")]
    AuditWriteFailure(String),

    /// Backing store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid engine configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for authorization engine operations.
pub type AuthzResult<T> = Result<T, AuthzError>;

impl AuthzError {
    /// Shorthand for a missing entity.
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        AuthzError::NotFound { entity, id }
    }

    /// Check if this error should be logged at error level.
    ///
    /// Constraint violations and missing entities are caller mistakes; audit
    /// and store failures are not.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AuthzError::AuditWriteFailure(_) | AuthzError::Store(_) | AuthzError::Config(_)
        )
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthzError::NotFound { .. } => "NOT_FOUND",
            AuthzError::InvalidInput(_) => "INVALID_INPUT",
            AuthzError::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            AuthzError::AuditWriteFailure(_) => "AUDIT_WRITE_FAILURE",
            AuthzError::Store(_) => "STORE_ERROR",
            AuthzError::Config(_) => "CONFIG_ERROR",
        }
    }
}
