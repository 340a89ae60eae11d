//! Static policy table and role hierarchy
//!
//! The table is defined once, as `const` data, and never mutated. Seniority is
//! not structurally required to imply a superset of permissions; that is an
//! authoring convention checked by [`verify_policy`].

use crate::error::PolicyResult;
use crate::rbac::permission_set::PermissionSet;
use crate::rbac::projector;
use crate::rbac::types::{Permission, Role};
use serde::Serialize;
use std::fmt;

use Permission::*;

const LEADER: PermissionSet = PermissionSet::all();

const COLEADER: PermissionSet = LEADER.difference(PermissionSet::from_slice(&[
    OrgCreate,
    OrgDelete,
    EventCreate,
    UserInvite,
]));

const MEMBER: PermissionSet = PermissionSet::from_slice(&[
    OrgRead,
    OrgViewAnalytics,
    EventRead,
    EventUpdate,
    EventManageRegistrations,
    TeamRead,
    TaskCreate,
    TaskRead,
    TaskUpdate,
    TaskComplete,
    BudgetRead,
    BudgetViewAnalytics,
    UserViewProfile,
    UserUpdateProfile,
]);

const VOLUNTEER: PermissionSet = PermissionSet::from_slice(&[EventRead, TaskRead]);

/// Permissions granted by a role
pub const fn get_role_permissions(role: Role) -> PermissionSet {
    match role {
        Role::Leader => LEADER,
        Role::Coleader => COLEADER,
        Role::Member => MEMBER,
        Role::Volunteer => VOLUNTEER,
    }
}

/// Look up a role's permissions by name, failing on names outside the hierarchy
pub fn role_permissions_by_name(name: &str) -> PolicyResult<PermissionSet> {
    Ok(get_role_permissions(name.parse()?))
}

/// Permissions of an optional role; an absent role contributes nothing
pub fn permissions_of(role: Option<Role>) -> PermissionSet {
    role.map(get_role_permissions).unwrap_or_default()
}

pub const fn role_rank(role: Role) -> u8 {
    role.rank()
}

/// `a` is as senior as `b` or more
pub const fn is_at_least(a: Role, b: Role) -> bool {
    role_rank(a) >= role_rank(b)
}

/// `a` is strictly more senior than `b`
pub const fn outranks(a: Role, b: Role) -> bool {
    role_rank(a) > role_rank(b)
}

/// A policy authoring problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyFinding {
    /// A more senior role lacks permissions a junior role has
    NonMonotonic {
        junior: Role,
        senior: Role,
        missing: PermissionSet,
    },
    /// No role grants this permission, so checks against it are dead code
    UngrantedPermission { permission: Permission },
    /// The permission has no access tier in its resource's vocabulary
    UntieredPermission { permission: Permission },
    /// A vocabulary entry names a permission of a different resource
    MisfiledTier { permission: Permission },
}

impl fmt::Display for PolicyFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyFinding::NonMonotonic {
                junior,
                senior,
                missing,
            } => write!(
                f,
                "{} lacks permissions granted to {}: {}",
                senior,
                junior,
                missing.tags().join(", ")
            ),
            PolicyFinding::UngrantedPermission { permission } => {
                write!(f, "{} is not granted by any role", permission)
            }
            PolicyFinding::UntieredPermission { permission } => {
                write!(f, "{} has no access tier", permission)
            }
            PolicyFinding::MisfiledTier { permission } => {
                write!(
                    f,
                    "{} is listed in a vocabulary other than {}",
                    permission,
                    permission.resource()
                )
            }
        }
    }
}

/// Result of [`verify_policy`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct PolicyReport {
    pub findings: Vec<PolicyFinding>,
}

impl PolicyReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Check the built-in table and projector vocabulary against the authoring
/// conventions: seniority implies a superset, every tag is granted somewhere,
/// and every tag has exactly one tier in its own family.
pub fn verify_policy() -> PolicyReport {
    let mut findings = Vec::new();

    for pair in Role::ALL.windows(2) {
        let (junior, senior) = (pair[0], pair[1]);
        let missing = get_role_permissions(junior).difference(get_role_permissions(senior));
        if !missing.is_empty() {
            findings.push(PolicyFinding::NonMonotonic {
                junior,
                senior,
                missing,
            });
        }
    }

    let granted = Role::ALL
        .iter()
        .fold(PermissionSet::EMPTY, |acc, r| acc.union(get_role_permissions(*r)));

    for permission in Permission::all() {
        if !granted.contains(*permission) {
            findings.push(PolicyFinding::UngrantedPermission {
                permission: *permission,
            });
        }
        if projector::tier_of(*permission).is_none() {
            findings.push(PolicyFinding::UntieredPermission {
                permission: *permission,
            });
        }
    }

    for (resource, vocabulary) in projector::vocabularies() {
        for (permission, _) in vocabulary {
            if permission.resource() != resource {
                findings.push(PolicyFinding::MisfiledTier {
                    permission: *permission,
                });
            }
        }
    }

    PolicyReport { findings }
}
