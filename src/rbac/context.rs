//! User context construction
//!
//! A [`UserContext`] is the aggregated, immutable view of one identity's
//! effective permissions inside one organization (and optionally one team).
//! It is rebuilt whenever its inputs change and never cached.

use crate::config::PolicyConfig;
use crate::error::ConfigError;
use crate::rbac::permission_set::PermissionSet;
use crate::rbac::policy::permissions_of;
use crate::rbac::types::{Permission, Role};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Grants every organization owner receives regardless of role
pub const OWNER_ESCALATION: PermissionSet =
    PermissionSet::from_slice(&[Permission::EventCreate, Permission::UserInvite]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(pub u64);

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An already-resolved user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    /// Role held independent of any organization
    #[serde(default)]
    pub global_role: Option<Role>,
}

impl Identity {
    pub fn new(id: u64) -> Self {
        Self {
            id: UserId(id),
            global_role: None,
        }
    }

    pub fn with_global_role(mut self, role: Role) -> Self {
        self.global_role = Some(role);
        self
    }
}

/// The organization under evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrgId,
    pub owner_id: UserId,
}

impl Organization {
    pub fn new(id: u64, owner_id: u64) -> Self {
        Self {
            id: OrgId(id),
            owner_id: UserId(owner_id),
        }
    }

    pub fn is_owned_by(&self, user: &Identity) -> bool {
        self.owner_id == user.id
    }
}

/// Where a context's organization role came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSource {
    /// Supplied by organization membership data
    Explicit,
    /// Membership data was missing; the user's global role stands in
    GlobalFallback,
    /// No organization role at all
    Absent,
}

/// Effective permissions of one identity within one organization/team scope.
///
/// Role fields are informational. Decisions consult `permissions`, and two
/// contexts compare equal when their permission sets do.
#[derive(Debug, Clone, Serialize)]
pub struct UserContext {
    user_id: UserId,
    organization_role: Option<Role>,
    organization_role_source: RoleSource,
    team_role: Option<Role>,
    owner: bool,
    permissions: PermissionSet,
}

impl UserContext {
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn organization_role(&self) -> Option<Role> {
        self.organization_role
    }

    pub fn organization_role_source(&self) -> RoleSource {
        self.organization_role_source
    }

    pub fn team_role(&self) -> Option<Role> {
        self.team_role
    }

    /// Whether the owner escalation was applied
    pub fn is_owner(&self) -> bool {
        self.owner
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }
}

impl PartialEq for UserContext {
    fn eq(&self, other: &Self) -> bool {
        self.permissions == other.permissions
    }
}

impl Eq for UserContext {}

/// Builds user contexts under one configuration.
///
/// Holds only immutable settings; share it freely across threads.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    global_role_fallback: bool,
    owner_grants: PermissionSet,
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self {
            global_role_fallback: true,
            owner_grants: OWNER_ESCALATION,
        }
    }
}

impl PolicyEngine {
    /// Create an engine from configuration
    pub fn new(config: &PolicyConfig) -> Result<Self, ConfigError> {
        let mut owner_grants = OWNER_ESCALATION;
        for tag in &config.owner_grants {
            let permission =
                Permission::try_parse(tag).ok_or_else(|| ConfigError::InvalidPermission {
                    tag: tag.clone(),
                    field: "policy.owner_grants".to_string(),
                })?;
            owner_grants.insert(permission);
        }

        Ok(Self {
            global_role_fallback: config.global_role_fallback,
            owner_grants,
        })
    }

    pub fn global_role_fallback(&self) -> bool {
        self.global_role_fallback
    }

    /// Everything an owner is granted on top of their roles
    pub fn owner_grants(&self) -> &PermissionSet {
        &self.owner_grants
    }

    /// Aggregate a user's roles into a context.
    ///
    /// Permissions are the union of the global, organization and team role
    /// entries; an absent role adds nothing. When `organization` is owned by
    /// `user` the owner grants are added on top.
    pub fn user_context(
        &self,
        user: &Identity,
        organization: Option<&Organization>,
        organization_role: Option<Role>,
        team_role: Option<Role>,
    ) -> UserContext {
        let (effective_org_role, source) = match organization_role {
            Some(role) => (Some(role), RoleSource::Explicit),
            None => self.fallback_role(user),
        };

        let mut permissions = permissions_of(user.global_role)
            .union(permissions_of(organization_role))
            .union(permissions_of(team_role));

        let owner = organization.is_some_and(|org| org.is_owned_by(user));
        if owner {
            permissions = permissions.union(self.owner_grants);
        }

        let org_id = organization.map(|o| o.id);
        debug!(
            user = %user.id,
            organization = ?org_id,
            organization_role = ?effective_org_role,
            source = ?source,
            team_role = ?team_role,
            owner,
            permissions = permissions.len(),
            "Built user context"
        );

        UserContext {
            user_id: user.id,
            organization_role: effective_org_role,
            organization_role_source: source,
            team_role,
            owner,
            permissions,
        }
    }

    fn fallback_role(&self, user: &Identity) -> (Option<Role>, RoleSource) {
        match user.global_role {
            Some(role) if self.global_role_fallback => (Some(role), RoleSource::GlobalFallback),
            _ => (None, RoleSource::Absent),
        }
    }
}

/// Build a context with the default engine settings
pub fn create_user_context(
    user: &Identity,
    organization: Option<&Organization>,
    organization_role: Option<Role>,
    team_role: Option<Role>,
) -> UserContext {
    PolicyEngine::default().user_context(user, organization, organization_role, team_role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::policy::get_role_permissions;

    #[test]
    fn test_no_roles_means_no_permissions() {
        let ctx = create_user_context(&Identity::new(1), None, None, None);
        assert!(ctx.permissions().is_empty());
        assert_eq!(ctx.organization_role(), None);
        assert_eq!(ctx.organization_role_source(), RoleSource::Absent);
    }

    #[test]
    fn test_org_and_team_roles_union() {
        let ctx = create_user_context(
            &Identity::new(1),
            None,
            Some(Role::Volunteer),
            Some(Role::Member),
        );
        let expected =
            get_role_permissions(Role::Volunteer).union(get_role_permissions(Role::Member));
        assert_eq!(*ctx.permissions(), expected);
        assert_eq!(ctx.organization_role(), Some(Role::Volunteer));
        assert_eq!(ctx.team_role(), Some(Role::Member));
    }

    #[test]
    fn test_global_role_fallback() {
        let user = Identity::new(7).with_global_role(Role::Coleader);
        let ctx = create_user_context(&user, None, None, None);
        assert_eq!(ctx.organization_role(), Some(Role::Coleader));
        assert_eq!(ctx.organization_role_source(), RoleSource::GlobalFallback);
        assert_eq!(*ctx.permissions(), get_role_permissions(Role::Coleader));
    }

    #[test]
    fn test_explicit_role_beats_fallback() {
        let user = Identity::new(7).with_global_role(Role::Volunteer);
        let ctx = create_user_context(&user, None, Some(Role::Member), None);
        assert_eq!(ctx.organization_role(), Some(Role::Member));
        assert_eq!(ctx.organization_role_source(), RoleSource::Explicit);
    }

    #[test]
    fn test_fallback_disabled() {
        let engine = PolicyEngine::new(&PolicyConfig {
            global_role_fallback: false,
            ..Default::default()
        })
        .unwrap();
        let user = Identity::new(7).with_global_role(Role::Leader);
        let ctx = engine.user_context(&user, None, None, None);

        assert_eq!(ctx.organization_role(), None);
        assert_eq!(ctx.organization_role_source(), RoleSource::Absent);
        // The global role still contributes permissions
        assert_eq!(*ctx.permissions(), get_role_permissions(Role::Leader));
    }

    #[test]
    fn test_owner_escalation() {
        let user = Identity::new(42);
        let org = Organization::new(1, 42);
        let ctx = create_user_context(&user, Some(&org), Some(Role::Member), None);

        assert!(ctx.is_owner());
        assert!(ctx.permissions().contains(Permission::EventCreate));
        assert!(ctx.permissions().contains(Permission::UserInvite));
        assert!(ctx.permissions().is_superset(&get_role_permissions(Role::Member)));
    }

    #[test]
    fn test_owner_without_role_still_escalated() {
        let ctx = create_user_context(
            &Identity::new(42),
            Some(&Organization::new(1, 42)),
            None,
            None,
        );
        assert_eq!(*ctx.permissions(), OWNER_ESCALATION);
    }

    #[test]
    fn test_non_owner_not_escalated() {
        let ctx = create_user_context(
            &Identity::new(5),
            Some(&Organization::new(1, 42)),
            Some(Role::Member),
            None,
        );
        assert!(!ctx.is_owner());
        assert!(!ctx.permissions().contains(Permission::EventCreate));
    }

    #[test]
    fn test_extra_owner_grants() {
        let engine = PolicyEngine::new(&PolicyConfig {
            owner_grants: vec!["event:publish".to_string()],
            ..Default::default()
        })
        .unwrap();
        assert!(engine.owner_grants().contains(Permission::EventPublish));
        assert!(engine.owner_grants().is_superset(&OWNER_ESCALATION));

        let ctx = engine.user_context(
            &Identity::new(3),
            Some(&Organization::new(9, 3)),
            Some(Role::Volunteer),
            None,
        );
        assert!(ctx.permissions().contains(Permission::EventPublish));
    }

    #[test]
    fn test_invalid_owner_grant() {
        let result = PolicyEngine::new(&PolicyConfig {
            owner_grants: vec!["event:approve".to_string()],
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(ConfigError::InvalidPermission { ref tag, .. }) if tag == "event:approve"
        ));
    }

    #[test]
    fn test_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UserContext>();
        assert_send_sync::<PermissionSet>();
        assert_send_sync::<PolicyEngine>();

        let engine = PolicyEngine::default();
        let ctx = engine.user_context(&Identity::new(1), None, Some(Role::Member), None);
        let handle = std::thread::spawn(move || (engine, ctx));
        let (_, ctx) = handle.join().unwrap();
        assert!(ctx.permissions().contains(Permission::TaskCreate));
    }

    #[test]
    fn test_equality_ignores_role_fields() {
        let a = create_user_context(&Identity::new(1), None, Some(Role::Leader), None);
        let b = create_user_context(&Identity::new(2), None, None, Some(Role::Leader));
        assert_eq!(a, b);
        assert_ne!(a.organization_role(), b.organization_role());
    }
}
