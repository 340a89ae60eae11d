//! Property tests for context aggregation and decision queries

use org_rbac::rbac::{
    AccessLevel, Identity, Organization, Permission, PermissionSet, Resource, Role,
    create_user_context, get_access_level, get_role_permissions, has_all_permissions,
    has_any_permission, has_permission, has_role_or_higher, is_at_least,
};
use proptest::prelude::*;

fn any_role() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

fn any_permission() -> impl Strategy<Value = Permission> {
    prop::sample::select(Permission::ALL.to_vec())
}

fn any_resource() -> impl Strategy<Value = Resource> {
    prop::sample::select(Resource::ALL.to_vec())
}

proptest! {
    #[test]
    fn test_union_contains_every_role_entry(
        global in prop::option::of(any_role()),
        org in any_role(),
        team in any_role(),
    ) {
        let user = Identity { global_role: global, ..Identity::new(1) };
        let ctx = create_user_context(&user, None, Some(org), Some(team));

        let expected = get_role_permissions(org).union(get_role_permissions(team));
        prop_assert!(ctx.permissions().is_superset(&expected));
        if let Some(g) = global {
            prop_assert!(ctx.permissions().is_superset(&get_role_permissions(g)));
        }
    }

    #[test]
    fn test_context_construction_is_deterministic(
        user_id in 0u64..20,
        owner_id in 0u64..20,
        org in prop::option::of(any_role()),
        team in prop::option::of(any_role()),
    ) {
        let user = Identity::new(user_id);
        let organization = Organization::new(1, owner_id);
        let a = create_user_context(&user, Some(&organization), org, team);
        let b = create_user_context(&user, Some(&organization), org, team);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn test_escalation_only_adds(
        user_id in 0u64..5,
        owner_id in 0u64..5,
        org in prop::option::of(any_role()),
        team in prop::option::of(any_role()),
    ) {
        let user = Identity::new(user_id);
        let organization = Organization::new(1, owner_id);
        let plain = create_user_context(&user, None, org, team);
        let scoped = create_user_context(&user, Some(&organization), org, team);

        prop_assert!(scoped.permissions().is_superset(plain.permissions()));
        if user_id == owner_id {
            prop_assert!(scoped.has_permission(Permission::EventCreate));
            prop_assert!(scoped.has_permission(Permission::UserInvite));
        } else {
            prop_assert_eq!(scoped, plain);
        }
    }

    #[test]
    fn test_any_and_all_agree_with_single_checks(
        role in any_role(),
        wanted in prop::collection::vec(any_permission(), 0..6),
    ) {
        let ctx = create_user_context(&Identity::new(1), None, Some(role), None);
        let each: Vec<bool> = wanted.iter().map(|p| has_permission(Some(&ctx), *p)).collect();

        prop_assert_eq!(has_any_permission(Some(&ctx), &wanted), each.iter().any(|b| *b));
        prop_assert_eq!(has_all_permissions(Some(&ctx), &wanted), each.iter().all(|b| *b));
    }

    #[test]
    fn test_role_or_higher_follows_rank(held in any_role(), min in any_role()) {
        let ctx = create_user_context(&Identity::new(1), None, Some(held), None);
        prop_assert_eq!(has_role_or_higher(Some(&ctx), min), held.rank() >= min.rank());
        prop_assert_eq!(is_at_least(held, min), held >= min);
    }

    #[test]
    fn test_access_level_is_backed_by_a_permission(
        role in any_role(),
        resource in any_resource(),
    ) {
        let ctx = create_user_context(&Identity::new(1), None, Some(role), None);
        let level = get_access_level(Some(&ctx), resource);
        let held = ctx
            .permissions()
            .intersection(PermissionSet::of_resource(resource));
        prop_assert_eq!(level == AccessLevel::None, held.is_empty());
    }

    #[test]
    fn test_more_permissions_never_lower_access(
        role in any_role(),
        extra in prop::option::of(any_role()),
        resource in any_resource(),
    ) {
        let base = create_user_context(&Identity::new(1), None, Some(role), None);
        let wider = create_user_context(&Identity::new(1), None, Some(role), extra);
        prop_assert!(get_access_level(Some(&wider), resource) >= get_access_level(Some(&base), resource));
    }
}
