//! org-rbac
//!
//! Command-line front end for inspecting the policy table and evaluating
//! decisions against ad hoc user contexts.

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use org_rbac::{
    config::{AppConfig, LOG_LEVELS, LogFormat, load_config},
    rbac::{
        AccessLevel, Capabilities, Identity, Organization, Permission, PolicyEngine, Resource,
        Role, UserContext, get_access_level, get_role_permissions, has_all_permissions,
        has_any_permission, verify_policy,
    },
};
use serde::Serialize;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Role-based authorization engine for organizations and teams
#[derive(Parser, Debug)]
#[command(name = "org-rbac")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "ORG_RBAC_CONFIG")]
    config: Option<String>,

    /// Log level; overrides the config file
    #[arg(long, env = "ORG_RBAC_LOG_LEVEL", value_parser = PossibleValuesParser::new(LOG_LEVELS))]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the permissions a role grants
    Permissions {
        /// Role name (volunteer, member, coleader, leader)
        role: Role,
    },

    /// Check permissions for a user context (any-of unless --all)
    Check {
        #[command(flatten)]
        context: ContextArgs,

        /// Require every listed permission instead of any one
        #[arg(long)]
        all: bool,

        /// Permission tags, e.g. event:create
        #[arg(required = true)]
        permissions: Vec<Permission>,
    },

    /// Show the access level a user context holds over a resource
    Access {
        #[command(flatten)]
        context: ContextArgs,

        /// Resource family (org, event, team, task, budget, user)
        resource: Resource,
    },

    /// Print capabilities for every resource as JSON
    Capabilities {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Print the role x resource access matrix
    Matrix,

    /// Check the policy table against authoring conventions
    Verify,

    /// Print the effective configuration as TOML
    Config,
}

/// Inputs for building a user context
#[derive(Args, Debug)]
struct ContextArgs {
    /// User id
    #[arg(long, default_value_t = 1)]
    user_id: u64,

    /// User's global role
    #[arg(long)]
    global_role: Option<Role>,

    /// Role within the organization
    #[arg(long)]
    org_role: Option<Role>,

    /// Role within the team
    #[arg(long)]
    team_role: Option<Role>,

    /// Organization id
    #[arg(long, default_value_t = 1)]
    org_id: u64,

    /// Owner of the organization; enables owner escalation when it matches --user-id
    #[arg(long)]
    owner_id: Option<u64>,
}

impl ContextArgs {
    fn build(&self, engine: &PolicyEngine) -> UserContext {
        let user = Identity {
            id: org_rbac::rbac::UserId(self.user_id),
            global_role: self.global_role,
        };
        let organization = self
            .owner_id
            .map(|owner| Organization::new(self.org_id, owner));

        engine.user_context(&user, organization.as_ref(), self.org_role, self.team_role)
    }
}

#[derive(Serialize)]
struct CapabilityReport<'a> {
    context: &'a UserContext,
    capabilities: Vec<Capabilities>,
}

fn init_logging(config: &AppConfig, cli_level: Option<&str>) {
    let level = cli_level.unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn render_matrix() -> String {
    let mut out = format!("{:<10}", "role");
    for resource in Resource::all() {
        out.push_str(&format!(" {:<7}", resource.as_str()));
    }
    out = out.trim_end().to_string();
    out.push('\n');

    for role in Role::all().iter().rev() {
        let ctx = org_rbac::create_user_context(&Identity::new(0), None, Some(*role), None);
        let mut line = format!("{:<10}", role.as_str());
        for resource in Resource::all() {
            let level: AccessLevel = get_access_level(Some(&ctx), *resource);
            line.push_str(&format!(" {:<7}", level.as_str()));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load .env if present; a missing file is not an error
    dotenvy::dotenv().ok();

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config, cli.log_level.as_deref());

    info!(version = env!("CARGO_PKG_VERSION"), "Starting org-rbac");

    let engine = PolicyEngine::new(&config.policy)
        .inspect_err(|e| error!(error = %e, "Failed to create policy engine"))?;

    match cli.command {
        Command::Permissions { role } => {
            for permission in get_role_permissions(role).iter() {
                println!("{}", permission);
            }
        }
        Command::Check {
            context,
            all,
            permissions,
        } => {
            let ctx = context.build(&engine);
            let allowed = if all {
                has_all_permissions(Some(&ctx), &permissions)
            } else {
                has_any_permission(Some(&ctx), &permissions)
            };
            println!("{}", if allowed { "allowed" } else { "denied" });
            if !allowed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Access { context, resource } => {
            let ctx = context.build(&engine);
            println!("{}", get_access_level(Some(&ctx), resource));
        }
        Command::Capabilities { context } => {
            let ctx = context.build(&engine);
            let report = CapabilityReport {
                context: &ctx,
                capabilities: Capabilities::all(Some(&ctx)),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Matrix => {
            print!("{}", render_matrix());
        }
        Command::Verify => {
            let report = verify_policy();
            if report.is_clean() {
                println!("policy is consistent");
            } else {
                for finding in &report.findings {
                    warn!(%finding, "Policy finding");
                    println!("{}", finding);
                }
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
