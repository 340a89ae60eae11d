//! Resource access-level projection
//!
//! Every resource family has a vocabulary: each of its permissions mapped to
//! the tier it implies. The tier derivation is shared; adding a family means
//! adding one table here.

use crate::rbac::permission_set::PermissionSet;
use crate::rbac::types::{AccessLevel, Permission, Resource};
use tracing::trace;

use AccessLevel::{Admin, Read, Write};
use Permission::*;

type Vocabulary = &'static [(Permission, AccessLevel)];

const ORGANIZATION: Vocabulary = &[
    (OrgDelete, Admin),
    (OrgManageMembers, Admin),
    (OrgManageTeams, Admin),
    (OrgManageBudget, Admin),
    (OrgManageEvents, Admin),
    (OrgManageTasks, Admin),
    (OrgCreate, Write),
    (OrgUpdate, Write),
    (OrgRead, Read),
    (OrgViewAnalytics, Read),
];

// Handling registrations is participation, not event administration
const EVENT: Vocabulary = &[
    (EventDelete, Admin),
    (EventPublish, Admin),
    (EventCreate, Write),
    (EventUpdate, Write),
    (EventManageRegistrations, Write),
    (EventRead, Read),
];

const TEAM: Vocabulary = &[
    (TeamDelete, Admin),
    (TeamManageMembers, Admin),
    (TeamAssignTasks, Admin),
    (TeamCreate, Write),
    (TeamUpdate, Write),
    (TeamRead, Read),
];

const TASK: Vocabulary = &[
    (TaskDelete, Admin),
    (TaskAssign, Admin),
    (TaskCreate, Write),
    (TaskUpdate, Write),
    (TaskComplete, Write),
    (TaskRead, Read),
];

const BUDGET: Vocabulary = &[
    (BudgetDelete, Admin),
    (BudgetManageExpenses, Admin),
    (BudgetCreate, Write),
    (BudgetUpdate, Write),
    (BudgetRead, Read),
    (BudgetViewAnalytics, Read),
];

const USER: Vocabulary = &[
    (UserRemove, Admin),
    (UserChangeRole, Admin),
    (UserInvite, Write),
    (UserUpdateProfile, Write),
    (UserViewProfile, Read),
];

/// Tier table for one resource family
pub const fn vocabulary(resource: Resource) -> &'static [(Permission, AccessLevel)] {
    match resource {
        Resource::Organization => ORGANIZATION,
        Resource::Event => EVENT,
        Resource::Team => TEAM,
        Resource::Task => TASK,
        Resource::Budget => BUDGET,
        Resource::User => USER,
    }
}

/// All families with their tables
pub fn vocabularies() -> impl Iterator<Item = (Resource, &'static [(Permission, AccessLevel)])> {
    Resource::ALL.into_iter().map(|r| (r, vocabulary(r)))
}

/// Tier implied by holding a single permission
pub fn tier_of(permission: Permission) -> Option<AccessLevel> {
    vocabulary(permission.resource())
        .iter()
        .find(|(p, _)| *p == permission)
        .map(|(_, level)| *level)
}

/// Permissions of `resource` that imply exactly `level`
pub fn permissions_at(resource: Resource, level: AccessLevel) -> PermissionSet {
    vocabulary(resource)
        .iter()
        .filter(|(_, l)| *l == level)
        .map(|(p, _)| *p)
        .collect()
}

/// Highest tier over `resource` implied by any permission in `permissions`
pub fn project(permissions: &PermissionSet, resource: Resource) -> AccessLevel {
    let level = vocabulary(resource)
        .iter()
        .filter(|(p, _)| permissions.contains(*p))
        .map(|(_, level)| *level)
        .max()
        .unwrap_or(AccessLevel::None);

    trace!(resource = %resource, level = %level, "Projected access level");
    level
}
