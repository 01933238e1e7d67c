//! Diff resolution between desired and persisted assignment sets.

use super::{Allocation, AssignmentId, TaskAssignment};
use crate::identity::UserId;
use std::collections::HashMap;

/// A pending quantity change for an existing assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityUpdate {
    assignment_id: AssignmentId,
    quantity: u32,
}

impl QuantityUpdate {
    /// Returns the assignment to update.
    #[must_use]
    pub const fn assignment_id(&self) -> AssignmentId {
        self.assignment_id
    }

    /// Returns the new allocated quantity.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Create/update/delete operations reconciling a desired allocation set
/// against the persisted assignments of one task.
///
/// Application order is removals, then updates, then additions, so a user
/// moving between allocation buckets never transiently double-counts
/// against the (task, user) uniqueness constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentDiff {
    to_remove: Vec<AssignmentId>,
    to_update: Vec<QuantityUpdate>,
    to_add: Vec<Allocation>,
}

impl AssignmentDiff {
    /// Returns the assignments to delete, in persisted order.
    #[must_use]
    pub fn to_remove(&self) -> &[AssignmentId] {
        &self.to_remove
    }

    /// Returns the quantity updates, in desired order.
    #[must_use]
    pub fn to_update(&self) -> &[QuantityUpdate] {
        &self.to_update
    }

    /// Returns the allocations to create, in desired order.
    #[must_use]
    pub fn to_add(&self) -> &[Allocation] {
        &self.to_add
    }

    /// Returns whether the diff carries no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_update.is_empty() && self.to_add.is_empty()
    }

    /// Returns the total number of operations in the diff.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.to_remove.len() + self.to_update.len() + self.to_add.len()
    }
}

/// Computes the delta between persisted assignments and a desired set.
///
/// - Persisted entries whose user is absent from `desired` are removed.
/// - Desired entries whose user is absent from `persisted` are added with
///   the desired quantity.
/// - Desired entries present in `persisted` with a differing quantity are
///   updated in place; matching quantities produce no operation.
#[must_use]
pub fn resolve_diff(persisted: &[TaskAssignment], desired: &[Allocation]) -> AssignmentDiff {
    let desired_by_user: HashMap<UserId, u32> = desired
        .iter()
        .map(|allocation| (allocation.user_id(), allocation.quantity()))
        .collect();
    let persisted_by_user: HashMap<UserId, &TaskAssignment> = persisted
        .iter()
        .map(|assignment| (assignment.user_id(), assignment))
        .collect();

    let to_remove = persisted
        .iter()
        .filter(|assignment| !desired_by_user.contains_key(&assignment.user_id()))
        .map(TaskAssignment::id)
        .collect();

    let mut to_update = Vec::new();
    let mut to_add = Vec::new();
    for allocation in desired {
        match persisted_by_user.get(&allocation.user_id()) {
            Some(existing) if existing.allocated() == allocation.quantity() => {}
            Some(existing) => to_update.push(QuantityUpdate {
                assignment_id: existing.id(),
                quantity: allocation.quantity(),
            }),
            None => to_add.push(*allocation),
        }
    }

    AssignmentDiff {
        to_remove,
        to_update,
        to_add,
    }
}
