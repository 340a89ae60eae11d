//! Fixed-size permission set
//!
//! A `u64` bitset indexed by [`Permission`] discriminant. Membership, union and
//! subset tests are single instructions, and the whole set is `Copy`, so
//! contexts can be shared across threads without synchronization.

use crate::rbac::types::{Permission, Resource};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PermissionSet(u64);

impl PermissionSet {
    pub const EMPTY: PermissionSet = PermissionSet(0);

    /// Build a set in const context
    pub const fn from_slice(permissions: &[Permission]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < permissions.len() {
            bits |= 1u64 << permissions[i].index();
            i += 1;
        }
        Self(bits)
    }

    /// Every known permission
    pub const fn all() -> Self {
        Self::from_slice(&Permission::ALL)
    }

    /// Every permission of one resource family
    pub fn of_resource(resource: Resource) -> Self {
        resource.permissions().collect()
    }

    pub const fn contains(&self, permission: Permission) -> bool {
        self.0 & (1u64 << permission.index()) != 0
    }

    pub fn insert(&mut self, permission: Permission) -> bool {
        let had = self.contains(permission);
        self.0 |= 1u64 << permission.index();
        !had
    }

    pub fn remove(&mut self, permission: Permission) -> bool {
        let had = self.contains(permission);
        self.0 &= !(1u64 << permission.index());
        had
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Permissions in `self` that are not in `other`
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub const fn is_superset(&self, other: &Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_subset(&self, other: &Self) -> bool {
        other.is_superset(self)
    }

    pub const fn intersects(&self, other: &Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate members in discriminant order
    pub fn iter(&self) -> impl Iterator<Item = Permission> {
        let set = *self;
        Permission::ALL.into_iter().filter(move |p| set.contains(*p))
    }

    /// Members as their string tags
    pub fn tags(&self) -> Vec<&'static str> {
        self.iter().map(|p| p.as_str()).collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut set = PermissionSet::EMPTY;
        set.extend(iter);
        set
    }
}

impl<'a> FromIterator<&'a Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = &'a Permission>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

impl Extend<Permission> for PermissionSet {
    fn extend<I: IntoIterator<Item = Permission>>(&mut self, iter: I) {
        for p in iter {
            self.insert(p);
        }
    }
}

impl From<Permission> for PermissionSet {
    fn from(value: Permission) -> Self {
        Self::from_slice(&[value])
    }
}

impl<const N: usize> From<[Permission; N]> for PermissionSet {
    fn from(value: [Permission; N]) -> Self {
        Self::from_slice(&value)
    }
}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|p| p.as_str())).finish()
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
