//! Decision queries over a user context
//!
//! Every query accepts `Option<&UserContext>` and fails closed: with no
//! context the answer is `false`, [`AccessLevel::None`], empty capabilities or
//! [`AccessDecision::Denied`]. Nothing here returns an error for a missing
//! grant.

use crate::error::AccessDeniedError;
use crate::rbac::context::UserContext;
use crate::rbac::permission_set::PermissionSet;
use crate::rbac::policy::{is_at_least, outranks};
use crate::rbac::projector;
use crate::rbac::types::{AccessLevel, Permission, Resource, Role};
use serde::Serialize;
use tracing::debug;

pub fn has_permission(ctx: Option<&UserContext>, permission: Permission) -> bool {
    ctx.is_some_and(|c| c.permissions().contains(permission))
}

/// True when at least one of `permissions` is held. An empty list is never satisfied.
pub fn has_any_permission(ctx: Option<&UserContext>, permissions: &[Permission]) -> bool {
    let wanted: PermissionSet = permissions.iter().collect();
    ctx.is_some_and(|c| c.permissions().intersects(&wanted))
}

/// True when every one of `permissions` is held. An empty list is vacuously
/// satisfied, but only for a present context.
pub fn has_all_permissions(ctx: Option<&UserContext>, permissions: &[Permission]) -> bool {
    let wanted: PermissionSet = permissions.iter().collect();
    ctx.is_some_and(|c| c.permissions().is_superset(&wanted))
}

/// Exact match on the organization role. Team roles are not consulted.
pub fn has_role(ctx: Option<&UserContext>, role: Role) -> bool {
    ctx.and_then(UserContext::organization_role) == Some(role)
}

pub fn has_role_or_higher(ctx: Option<&UserContext>, min_role: Role) -> bool {
    ctx.and_then(UserContext::organization_role)
        .is_some_and(|role| is_at_least(role, min_role))
}

/// True only when the organization role strictly outranks `target`; peers and
/// seniors can never be managed.
pub fn can_manage_role(ctx: Option<&UserContext>, target: Role) -> bool {
    ctx.and_then(UserContext::organization_role)
        .is_some_and(|role| outranks(role, target))
}

pub fn get_access_level(ctx: Option<&UserContext>, resource: Resource) -> AccessLevel {
    match ctx {
        Some(c) => projector::project(c.permissions(), resource),
        None => AccessLevel::None,
    }
}

/// Keep the items `check` accepts for this context
pub fn filter_by_permissions<T, I, F>(items: I, ctx: Option<&UserContext>, check: F) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T, &UserContext) -> bool,
{
    match ctx {
        Some(c) => items.into_iter().filter(|item| check(item, c)).collect(),
        None => Vec::new(),
    }
}

impl UserContext {
    pub fn has_permission(&self, permission: Permission) -> bool {
        has_permission(Some(self), permission)
    }

    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        has_any_permission(Some(self), permissions)
    }

    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        has_all_permissions(Some(self), permissions)
    }

    pub fn has_role(&self, role: Role) -> bool {
        has_role(Some(self), role)
    }

    pub fn has_role_or_higher(&self, min_role: Role) -> bool {
        has_role_or_higher(Some(self), min_role)
    }

    pub fn can_manage_role(&self, target: Role) -> bool {
        can_manage_role(Some(self), target)
    }

    pub fn access_level(&self, resource: Resource) -> AccessLevel {
        get_access_level(Some(self), resource)
    }
}

/// Result of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access is allowed
    Allowed,
    /// Access is denied with a reason
    Denied(String),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessDecision::Denied(_))
    }
}

/// A composite requirement.
///
/// Each configured clause must pass; clauses left unset pass trivially. A
/// guard with no clauses allows any present context.
#[derive(Debug, Clone, Default)]
pub struct Guard {
    action: String,
    permission: Option<Permission>,
    any_of: Option<Vec<Permission>>,
    all_of: Option<Vec<Permission>>,
    role: Option<Role>,
    min_role: Option<Role>,
    can_manage: Option<Role>,
    access_level: Option<(Resource, AccessLevel)>,
    min_access_level: Option<(Resource, AccessLevel)>,
}

impl Guard {
    /// Start a guard for a named action; the name only appears in denials
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    pub fn any_of(mut self, permissions: impl Into<Vec<Permission>>) -> Self {
        self.any_of = Some(permissions.into());
        self
    }

    pub fn all_of(mut self, permissions: impl Into<Vec<Permission>>) -> Self {
        self.all_of = Some(permissions.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn min_role(mut self, role: Role) -> Self {
        self.min_role = Some(role);
        self
    }

    pub fn can_manage(mut self, target: Role) -> Self {
        self.can_manage = Some(target);
        self
    }

    /// Require exactly `level` over `resource`
    pub fn access_level(mut self, resource: Resource, level: AccessLevel) -> Self {
        self.access_level = Some((resource, level));
        self
    }

    /// Require at least `level` over `resource`
    pub fn min_access_level(mut self, resource: Resource, level: AccessLevel) -> Self {
        self.min_access_level = Some((resource, level));
        self
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Evaluate every clause, reporting the first that fails
    pub fn check(&self, ctx: Option<&UserContext>) -> AccessDecision {
        match self.decide(ctx) {
            Ok(()) => AccessDecision::Allowed,
            Err(denied) => AccessDecision::Denied(denied.reason),
        }
    }

    /// Check the guard, returning an error if denied
    pub fn require(&self, ctx: Option<&UserContext>) -> Result<(), AccessDeniedError> {
        self.decide(ctx)
    }

    fn decide(&self, ctx: Option<&UserContext>) -> Result<(), AccessDeniedError> {
        let result = self.evaluate(ctx);
        let user = ctx.map(UserContext::user_id);
        let reason = result.as_ref().err().map(|e| e.reason.as_str());
        debug!(
            action = %self.action,
            user = ?user,
            allowed = result.is_ok(),
            reason = ?reason,
            "Guard evaluated"
        );
        result
    }

    fn evaluate(&self, ctx: Option<&UserContext>) -> Result<(), AccessDeniedError> {
        let action = self.action.as_str();
        let Some(c) = ctx else {
            return Err(AccessDeniedError::no_context(action));
        };

        if let Some(p) = self.permission
            && !c.has_permission(p)
        {
            return Err(AccessDeniedError::missing_permission(action, p));
        }

        if let Some(ps) = &self.any_of
            && !c.has_any_permission(ps)
        {
            return Err(AccessDeniedError::missing_any(action, join_tags(ps)));
        }

        if let Some(ps) = &self.all_of
            && !c.has_all_permissions(ps)
        {
            return Err(AccessDeniedError::missing_all(action, join_tags(ps)));
        }

        if let Some(role) = self.role
            && !c.has_role(role)
        {
            return Err(AccessDeniedError::insufficient_role(action, role));
        }

        if let Some(role) = self.min_role
            && !c.has_role_or_higher(role)
        {
            return Err(AccessDeniedError::below_role(action, role));
        }

        if let Some(target) = self.can_manage
            && !c.can_manage_role(target)
        {
            return Err(AccessDeniedError::cannot_manage(action, target));
        }

        if let Some((resource, level)) = self.access_level
            && c.access_level(resource) != level
        {
            return Err(AccessDeniedError::access_mismatch(action, level, resource));
        }

        if let Some((resource, level)) = self.min_access_level
            && c.access_level(resource) < level
        {
            return Err(AccessDeniedError::insufficient_access(action, level, resource));
        }

        Ok(())
    }
}

fn join_tags(permissions: &[Permission]) -> String {
    permissions
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// What a context may do to one resource family
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub resource: Resource,
    pub access_level: AccessLevel,
    /// Granted subset of the family's permissions
    pub granted: PermissionSet,
}

impl Capabilities {
    pub fn for_resource(ctx: Option<&UserContext>, resource: Resource) -> Self {
        let granted = ctx
            .map(|c| c.permissions().intersection(PermissionSet::of_resource(resource)))
            .unwrap_or_default();

        Self {
            resource,
            access_level: get_access_level(ctx, resource),
            granted,
        }
    }

    /// Capabilities for every resource family
    pub fn all(ctx: Option<&UserContext>) -> Vec<Self> {
        Resource::all()
            .iter()
            .map(|r| Self::for_resource(ctx, *r))
            .collect()
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.granted.contains(permission)
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}
