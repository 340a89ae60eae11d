//! Error types for org-rbac
//!
//! Two failure classes exist. Configuration errors (unknown role, permission
//! or resource names, bad config files) are returned as `Err` at the point of
//! misuse. Authorization misses are never errors: queries resolve to `false`
//! or `AccessLevel::None`, and only [`AccessDeniedError`] exists so callers
//! that want `?`-style guards can have them.

use std::fmt;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Access denied: {0}")]
    AccessDenied(#[from] AccessDeniedError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid permission '{tag}' in {field}")]
    InvalidPermission { tag: String, field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A name that does not correspond to any entry of the closed policy vocabulary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("unknown permission '{0}'")]
    UnknownPermission(String),

    #[error("unknown resource '{0}'")]
    UnknownResource(String),
}

/// Raised by guards when a caller asks for an error instead of a verdict
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Access denied for '{action}': {reason}")]
pub struct AccessDeniedError {
    pub action: String,
    pub reason: String,
}

impl AccessDeniedError {
    pub fn new(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            reason: reason.into(),
        }
    }

    pub fn no_context(action: impl Into<String>) -> Self {
        Self::new(action, "no user context is available")
    }

    pub fn missing_permission(action: impl Into<String>, permission: impl fmt::Display) -> Self {
        Self::new(action, format!("missing permission '{}'", permission))
    }

    /// None of the alternatives is held; `tags` is the rendered list
    pub fn missing_any(action: impl Into<String>, tags: impl fmt::Display) -> Self {
        Self::new(action, format!("requires any of [{}]", tags))
    }

    pub fn missing_all(action: impl Into<String>, tags: impl fmt::Display) -> Self {
        Self::new(action, format!("requires all of [{}]", tags))
    }

    pub fn insufficient_role(action: impl Into<String>, required: impl fmt::Display) -> Self {
        Self::new(action, format!("requires role '{}'", required))
    }

    pub fn below_role(action: impl Into<String>, minimum: impl fmt::Display) -> Self {
        Self::new(action, format!("requires role '{}' or higher", minimum))
    }

    pub fn cannot_manage(action: impl Into<String>, target: impl fmt::Display) -> Self {
        Self::new(action, format!("cannot manage role '{}'", target))
    }

    pub fn insufficient_access(
        action: impl Into<String>,
        level: impl fmt::Display,
        resource: impl fmt::Display,
    ) -> Self {
        Self::new(action, format!("requires '{}' access to {}", level, resource))
    }

    pub fn access_mismatch(
        action: impl Into<String>,
        level: impl fmt::Display,
        resource: impl fmt::Display,
    ) -> Self {
        Self::new(action, format!("requires exactly '{}' access to {}", level, resource))
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for vocabulary lookups
pub type PolicyResult<T> = std::result::Result<T, PolicyError>;
