//! Role-based access control
//!
//! Decides what an identity may do inside an organization and team.
//!
//! ## Model
//!
//! ```text
//! identity + roles → UserContext → queries → bool / AccessLevel
//! ```
//!
//! 1. **Policy table** - every [`Role`] maps to a fixed [`PermissionSet`]
//! 2. **Hierarchy** - `volunteer < member < coleader < leader`
//! 3. **Context** - union of the global, organization and team role entries,
//!    plus owner escalation (`event:create`, `user:invite`) for the
//!    organization's owner
//! 4. **Queries** - permission, any-of, all-of, role, role-or-higher,
//!    can-manage, access level
//!
//! All queries take `Option<&UserContext>` and fail closed.
//!
//! ## Example
//!
//! ```
//! use org_rbac::rbac::{
//!     AccessLevel, Identity, Organization, Permission, Resource, Role,
//!     create_user_context, get_access_level, has_permission,
//! };
//!
//! let user = Identity::new(42);
//! let org = Organization::new(1, 42);
//! let ctx = create_user_context(&user, Some(&org), Some(Role::Member), None);
//!
//! // Owners can always create events
//! assert!(has_permission(Some(&ctx), Permission::EventCreate));
//! assert_eq!(get_access_level(Some(&ctx), Resource::Budget), AccessLevel::Read);
//! assert_eq!(get_access_level(None, Resource::Budget), AccessLevel::None);
//! ```

pub mod context;
pub mod decision;
pub mod permission_set;
pub mod policy;
pub mod projector;
pub mod types;

pub use context::{
    Identity, OWNER_ESCALATION, OrgId, Organization, PolicyEngine, RoleSource, UserContext,
    UserId, create_user_context,
};
pub use decision::{
    AccessDecision, Capabilities, Guard, can_manage_role, filter_by_permissions,
    get_access_level, has_all_permissions, has_any_permission, has_permission, has_role,
    has_role_or_higher,
};
pub use permission_set::PermissionSet;
pub use policy::{
    PolicyFinding, PolicyReport, get_role_permissions, is_at_least, role_permissions_by_name,
    role_rank, verify_policy,
};
pub use types::{AccessLevel, Permission, Resource, Role};
