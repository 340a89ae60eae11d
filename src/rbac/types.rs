//! Policy vocabulary types
//!
//! Roles, resource families, permission tags and access tiers. All of them are
//! closed enumerations, so a misspelled tag is a compile error in Rust code and
//! a [`PolicyError`] when it arrives as a string.

use crate::error::PolicyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position in the organization/team hierarchy, least to most senior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Volunteer,
    Member,
    Coleader,
    Leader,
}

impl Role {
    /// Every role in ascending seniority
    pub const ALL: [Role; 4] = [Role::Volunteer, Role::Member, Role::Coleader, Role::Leader];

    /// Get the role name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Volunteer => "volunteer",
            Role::Member => "member",
            Role::Coleader => "coleader",
            Role::Leader => "leader",
        }
    }

    /// Stable ordinal consistent with the hierarchy
    pub const fn rank(&self) -> u8 {
        match self {
            Role::Volunteer => 1,
            Role::Member => 2,
            Role::Coleader => 3,
            Role::Leader => 4,
        }
    }

    /// Try to parse a role from a string
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "volunteer" => Some(Role::Volunteer),
            "member" => Some(Role::Member),
            "coleader" => Some(Role::Coleader),
            "leader" => Some(Role::Leader),
            _ => None,
        }
    }

    /// Get all roles
    pub fn all() -> &'static [Role] {
        &Self::ALL
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s).ok_or_else(|| PolicyError::UnknownRole(s.to_string()))
    }
}

/// Protected resource family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Resource {
    #[serde(rename = "org")]
    Organization,
    Event,
    Team,
    Task,
    Budget,
    User,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Organization,
        Resource::Event,
        Resource::Team,
        Resource::Task,
        Resource::Budget,
        Resource::User,
    ];

    /// Tag prefix used by this family's permissions
    pub const fn as_str(&self) -> &'static str {
        match self {
            Resource::Organization => "org",
            Resource::Event => "event",
            Resource::Team => "team",
            Resource::Task => "task",
            Resource::Budget => "budget",
            Resource::User => "user",
        }
    }

    /// Parse a resource name.
    ///
    /// Accepts the tag prefix, the plural, and `organization`, in any case,
    /// so both `budget` and `BUDGET` or `events` resolve.
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "org" | "orgs" | "organization" | "organizations" => Some(Resource::Organization),
            "event" | "events" => Some(Resource::Event),
            "team" | "teams" => Some(Resource::Team),
            "task" | "tasks" => Some(Resource::Task),
            "budget" | "budgets" => Some(Resource::Budget),
            "user" | "users" => Some(Resource::User),
            _ => None,
        }
    }

    pub fn all() -> &'static [Resource] {
        &Self::ALL
    }

    /// Every permission tag belonging to this family
    pub fn permissions(self) -> impl Iterator<Item = Permission> {
        Permission::ALL
            .into_iter()
            .filter(move |p| p.resource() == self)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Resource {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s).ok_or_else(|| PolicyError::UnknownResource(s.to_string()))
    }
}

impl TryFrom<String> for Resource {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Coarse access tier over a resource family
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    None,
    Read,
    Write,
    Admin,
}

impl AccessLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::None => "none",
            AccessLevel::Read => "read",
            AccessLevel::Write => "write",
            AccessLevel::Admin => "admin",
        }
    }

    /// Check if this tier allows reading
    pub const fn can_read(&self) -> bool {
        !matches!(self, AccessLevel::None)
    }

    /// Check if this tier allows modifying data
    pub const fn can_write(&self) -> bool {
        matches!(self, AccessLevel::Write | AccessLevel::Admin)
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An atomic `resource:action` capability tag.
///
/// The discriminant is the bit index inside a
/// [`PermissionSet`](super::PermissionSet), so variants must stay dense and
/// below 64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
#[repr(u8)]
pub enum Permission {
    OrgCreate,
    OrgRead,
    OrgUpdate,
    OrgDelete,
    OrgManageMembers,
    OrgManageTeams,
    OrgManageBudget,
    OrgManageEvents,
    OrgManageTasks,
    OrgViewAnalytics,

    EventCreate,
    EventRead,
    EventUpdate,
    EventDelete,
    EventManageRegistrations,
    EventPublish,

    TeamCreate,
    TeamRead,
    TeamUpdate,
    TeamDelete,
    TeamManageMembers,
    TeamAssignTasks,

    TaskCreate,
    TaskRead,
    TaskUpdate,
    TaskDelete,
    TaskAssign,
    TaskComplete,

    BudgetCreate,
    BudgetRead,
    BudgetUpdate,
    BudgetDelete,
    BudgetManageExpenses,
    BudgetViewAnalytics,

    UserInvite,
    UserRemove,
    UserChangeRole,
    UserViewProfile,
    UserUpdateProfile,
}

const _: () = assert!(Permission::ALL.len() <= 64);

impl Permission {
    /// Every permission, ordered by discriminant
    pub const ALL: [Permission; 39] = [
        Permission::OrgCreate,
        Permission::OrgRead,
        Permission::OrgUpdate,
        Permission::OrgDelete,
        Permission::OrgManageMembers,
        Permission::OrgManageTeams,
        Permission::OrgManageBudget,
        Permission::OrgManageEvents,
        Permission::OrgManageTasks,
        Permission::OrgViewAnalytics,
        Permission::EventCreate,
        Permission::EventRead,
        Permission::EventUpdate,
        Permission::EventDelete,
        Permission::EventManageRegistrations,
        Permission::EventPublish,
        Permission::TeamCreate,
        Permission::TeamRead,
        Permission::TeamUpdate,
        Permission::TeamDelete,
        Permission::TeamManageMembers,
        Permission::TeamAssignTasks,
        Permission::TaskCreate,
        Permission::TaskRead,
        Permission::TaskUpdate,
        Permission::TaskDelete,
        Permission::TaskAssign,
        Permission::TaskComplete,
        Permission::BudgetCreate,
        Permission::BudgetRead,
        Permission::BudgetUpdate,
        Permission::BudgetDelete,
        Permission::BudgetManageExpenses,
        Permission::BudgetViewAnalytics,
        Permission::UserInvite,
        Permission::UserRemove,
        Permission::UserChangeRole,
        Permission::UserViewProfile,
        Permission::UserUpdateProfile,
    ];

    /// The full `resource:action` tag
    pub const fn as_str(&self) -> &'static str {
        match self {
            Permission::OrgCreate => "org:create",
            Permission::OrgRead => "org:read",
            Permission::OrgUpdate => "org:update",
            Permission::OrgDelete => "org:delete",
            Permission::OrgManageMembers => "org:manage_members",
            Permission::OrgManageTeams => "org:manage_teams",
            Permission::OrgManageBudget => "org:manage_budget",
            Permission::OrgManageEvents => "org:manage_events",
            Permission::OrgManageTasks => "org:manage_tasks",
            Permission::OrgViewAnalytics => "org:view_analytics",
            Permission::EventCreate => "event:create",
            Permission::EventRead => "event:read",
            Permission::EventUpdate => "event:update",
            Permission::EventDelete => "event:delete",
            Permission::EventManageRegistrations => "event:manage_registrations",
            Permission::EventPublish => "event:publish",
            Permission::TeamCreate => "team:create",
            Permission::TeamRead => "team:read",
            Permission::TeamUpdate => "team:update",
            Permission::TeamDelete => "team:delete",
            Permission::TeamManageMembers => "team:manage_members",
            Permission::TeamAssignTasks => "team:assign_tasks",
            Permission::TaskCreate => "task:create",
            Permission::TaskRead => "task:read",
            Permission::TaskUpdate => "task:update",
            Permission::TaskDelete => "task:delete",
            Permission::TaskAssign => "task:assign",
            Permission::TaskComplete => "task:complete",
            Permission::BudgetCreate => "budget:create",
            Permission::BudgetRead => "budget:read",
            Permission::BudgetUpdate => "budget:update",
            Permission::BudgetDelete => "budget:delete",
            Permission::BudgetManageExpenses => "budget:manage_expenses",
            Permission::BudgetViewAnalytics => "budget:view_analytics",
            Permission::UserInvite => "user:invite",
            Permission::UserRemove => "user:remove",
            Permission::UserChangeRole => "user:change_role",
            Permission::UserViewProfile => "user:view_profile",
            Permission::UserUpdateProfile => "user:update_profile",
        }
    }

    /// Resource family this tag belongs to
    pub const fn resource(&self) -> Resource {
        match self {
            Permission::OrgCreate
            | Permission::OrgRead
            | Permission::OrgUpdate
            | Permission::OrgDelete
            | Permission::OrgManageMembers
            | Permission::OrgManageTeams
            | Permission::OrgManageBudget
            | Permission::OrgManageEvents
            | Permission::OrgManageTasks
            | Permission::OrgViewAnalytics => Resource::Organization,
            Permission::EventCreate
            | Permission::EventRead
            | Permission::EventUpdate
            | Permission::EventDelete
            | Permission::EventManageRegistrations
            | Permission::EventPublish => Resource::Event,
            Permission::TeamCreate
            | Permission::TeamRead
            | Permission::TeamUpdate
            | Permission::TeamDelete
            | Permission::TeamManageMembers
            | Permission::TeamAssignTasks => Resource::Team,
            Permission::TaskCreate
            | Permission::TaskRead
            | Permission::TaskUpdate
            | Permission::TaskDelete
            | Permission::TaskAssign
            | Permission::TaskComplete => Resource::Task,
            Permission::BudgetCreate
            | Permission::BudgetRead
            | Permission::BudgetUpdate
            | Permission::BudgetDelete
            | Permission::BudgetManageExpenses
            | Permission::BudgetViewAnalytics => Resource::Budget,
            Permission::UserInvite
            | Permission::UserRemove
            | Permission::UserChangeRole
            | Permission::UserViewProfile
            | Permission::UserUpdateProfile => Resource::User,
        }
    }

    /// The action half of the tag, e.g. `manage_expenses`
    pub fn action(&self) -> &'static str {
        match self.as_str().split_once(':') {
            Some((_, action)) => action,
            None => self.as_str(),
        }
    }

    /// Bit index inside a permission set
    pub(crate) const fn index(&self) -> u8 {
        *self as u8
    }

    /// Try to parse an exact `resource:action` tag
    pub fn try_parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == s)
    }

    pub fn all() -> &'static [Permission] {
        &Self::ALL
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Permission {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s).ok_or_else(|| PolicyError::UnknownPermission(s.to_string()))
    }
}

impl TryFrom<String> for Permission {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Permission> for &'static str {
    fn from(value: Permission) -> Self {
        value.as_str()
    }
}
