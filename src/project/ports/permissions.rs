//! Permission lookup port.

use crate::identity::UserId;
use crate::project::domain::Permission;

#[cfg(test)]
use mockall::automock;

/// Permission lookup contract.
///
/// Permission evaluation itself is an external concern; the guard consumes
/// the result as an opaque boolean predicate, synchronously.
#[cfg_attr(test, automock)]
pub trait PermissionOracle: Send + Sync {
    /// Returns whether `user` holds `permission`.
    fn has_permission(&self, user: UserId, permission: Permission) -> bool;
}
