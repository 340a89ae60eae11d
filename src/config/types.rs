//! Configuration types for org-rbac
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables. The policy table itself is not
//! configurable; only how contexts are assembled is.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Context construction settings
    pub policy: PolicyConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Context construction settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Use the user's global role as organization role when membership data
    /// carries none
    pub global_role_fallback: bool,

    /// Extra permission tags granted to organization owners, on top of
    /// `event:create` and `user:invite`
    #[serde(default)]
    pub owner_grants: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            global_role_fallback: true,
            owner_grants: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
