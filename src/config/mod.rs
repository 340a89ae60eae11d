//! Configuration module
//!
//! Layered settings (defaults, TOML file, `ORG_RBAC__*` environment) for how
//! user contexts are assembled and how the binary logs.

pub mod loader;
pub mod types;

pub use loader::{LOG_LEVELS, load_config, load_config_from_str};
pub use types::{AppConfig, LogFormat, LoggingConfig, PolicyConfig};
