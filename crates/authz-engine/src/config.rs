//! Engine configuration.
//!
//! Loaded from environment variables with defaults suitable for production;
//! hosts that embed the engine can also deserialize it from their own config.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Environment variable for [`EngineConfig::max_department_depth`].
pub const ENV_MAX_DEPARTMENT_DEPTH: &str = "AUTHZ_MAX_DEPARTMENT_DEPTH";

/// Environment variable for [`EngineConfig::require_audit_actor`].
pub const ENV_REQUIRE_AUDIT_ACTOR: &str = "AUTHZ_REQUIRE_AUDIT_ACTOR";

/// Upper bound accepted for the department depth guard.
const MAX_DEPTH_LIMIT: usize = 1024;

/// Authorization engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of parent hops any department walk may take.
    ///
    /// Writes that would make the tree deeper are rejected, and reads that
    /// hit the bound stop and answer "no match".
    pub max_department_depth: usize,

    /// Reject audit entries whose acting principal is the system principal.
    pub require_audit_actor: bool,
}

impl EngineConfig {
    /// Default department depth guard.
    pub const DEFAULT_MAX_DEPARTMENT_DEPTH: usize = 32;
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_department_depth: Self::DEFAULT_MAX_DEPARTMENT_DEPTH,
            require_audit_actor: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `AUTHZ_MAX_DEPARTMENT_DEPTH`: department walk bound (default: 32)
    /// - `AUTHZ_REQUIRE_AUDIT_ACTOR`: reject system-actor audit entries, true/false,
    ///   1/0, yes/no or on/off (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let max_department_depth = match lookup(ENV_MAX_DEPARTMENT_DEPTH) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_MAX_DEPARTMENT_DEPTH.to_string(),
                message: format!("expected a positive integer, got {raw:?}"),
            })?,
            None => default.max_department_depth,
        };

        let require_audit_actor = match lookup(ENV_REQUIRE_AUDIT_ACTOR) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: ENV_REQUIRE_AUDIT_ACTOR.to_string(),
                message: format!("expected true/false, got {raw:?}"),
            })?,
            None => default.require_audit_actor,
        };

        let config = Self {
            max_department_depth,
            require_audit_actor,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_department_depth == 0 || self.max_department_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::InvalidValue {
                key: ENV_MAX_DEPARTMENT_DEPTH.to_string(),
                message: format!(
                    "must be between 1 and {MAX_DEPTH_LIMIT}, got {}",
                    self.max_department_depth
                ),
            });
        }
        Ok(())
    }
}

/// Accepts true/false, 1/0, yes/no and on/off in any case.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.max_department_depth, 32);
        assert!(config.require_audit_actor);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            (ENV_MAX_DEPARTMENT_DEPTH, "8"),
            (ENV_REQUIRE_AUDIT_ACTOR, "false"),
        ]))
        .unwrap();

        assert_eq!(config.max_department_depth, 8);
        assert!(!config.require_audit_actor);
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_require_audit_actor_spellings() {
        for raw in ["FALSE", "no", " Off ", "0"] {
            let config =
                EngineConfig::from_lookup(lookup(&[(ENV_REQUIRE_AUDIT_ACTOR, raw)])).unwrap();
            assert!(!config.require_audit_actor, "{raw:?} should disable");
        }
        let config = EngineConfig::from_lookup(lookup(&[(ENV_REQUIRE_AUDIT_ACTOR, "Yes")])).unwrap();
        assert!(config.require_audit_actor);

        let err = EngineConfig::from_lookup(lookup(&[(ENV_REQUIRE_AUDIT_ACTOR, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_REQUIRE_AUDIT_ACTOR));
    }

    #[test]
    fn test_invalid_depth_rejected() {
        assert!(EngineConfig::from_lookup(lookup(&[(ENV_MAX_DEPARTMENT_DEPTH, "deep")])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[(ENV_MAX_DEPARTMENT_DEPTH, "0")])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[(ENV_MAX_DEPARTMENT_DEPTH, "5000")])).is_err());
    }
}
