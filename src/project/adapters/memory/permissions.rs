//! Static permission oracle backed by an explicit grant set.

use std::collections::HashSet;
use std::sync::RwLock;

use crate::identity::UserId;
use crate::project::domain::Permission;
use crate::project::ports::PermissionOracle;

/// Permission oracle answering from an in-memory grant set.
///
/// Intended for tests and reference wiring; a deployed console resolves
/// permissions from its auth layer.
#[derive(Debug, Default)]
pub struct StaticPermissions {
    grants: RwLock<HashSet<(UserId, Permission)>>,
}

impl StaticPermissions {
    /// Creates an oracle with no grants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `permission` to `user`.
    pub fn grant(&self, user: UserId, permission: Permission) {
        if let Ok(mut grants) = self.grants.write() {
            grants.insert((user, permission));
        }
    }

    /// Revokes `permission` from `user`.
    pub fn revoke(&self, user: UserId, permission: Permission) {
        if let Ok(mut grants) = self.grants.write() {
            grants.remove(&(user, permission));
        }
    }
}

impl PermissionOracle for StaticPermissions {
    fn has_permission(&self, user: UserId, permission: Permission) -> bool {
        self.grants
            .read()
            .is_ok_and(|grants| grants.contains(&(user, permission)))
    }
}
