//! Organization RBAC
//!
//! A pure, in-memory authorization policy engine for organizations and the
//! teams inside them.
//!
//! ## Features
//!
//! - **Closed vocabulary** of four roles and 39 `resource:action` permissions
//! - **Static policy table** with a seniority hierarchy
//! - **Scope aggregation** across global, organization and team roles, with
//!   owner escalation
//! - **Fail-closed queries** and per-resource access tiers
//!   (`none`, `read`, `write`, `admin`)
//!
//! ## Decision Flow
//!
//! ```text
//! identity + roles → UserContext → queries → verdicts
//! ```
//!
//! The engine never performs I/O. Callers resolve users, organizations and
//! memberships themselves and hand over the results.
//!
//! ## Example Configuration
//!
//! ```toml
//! [policy]
//! global_role_fallback = true
//! owner_grants = ["event:publish"]
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

pub mod config;
pub mod error;
pub mod rbac;

// Re-export main types
pub use config::{AppConfig, load_config};
pub use error::{AccessDeniedError, AppError, ConfigError, PolicyError, Result};
pub use rbac::{
    AccessLevel, Identity, Organization, Permission, PermissionSet, PolicyEngine, Resource, Role,
    UserContext, create_user_context,
};
