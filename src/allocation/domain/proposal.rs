//! Allocation proposals and the submission validation gate.

use super::{
    Allocation, AllocationDomainError, TaskAssignment, distribute_remainder, resolve_diff,
    seed_allocations,
};
use crate::identity::UserId;
use serde::{Deserialize, Serialize};

/// A seeded-and-distributed allocation awaiting caller confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationProposal {
    allocations: Vec<Allocation>,
    remaining: u32,
    is_valid: bool,
}

impl AllocationProposal {
    /// Builds a proposal for `selection` against the persisted assignments.
    ///
    /// Already-assigned users keep their persisted quantity as a seed; the
    /// unallocated remainder is split evenly across the newly added users.
    #[must_use]
    pub fn build(total_due: u32, selection: &[UserId], persisted: &[TaskAssignment]) -> Self {
        let seeded = seed_allocations(selection, persisted);
        let allocations = distribute_remainder(total_due, &seeded);
        let requested: u32 = allocations.iter().map(Allocation::quantity).sum();
        let is_valid = validate_proposal(persisted, &allocations, total_due).is_ok();
        Self {
            allocations,
            remaining: total_due.saturating_sub(requested),
            is_valid,
        }
    }

    /// Returns the proposed per-user allocations, in selection order.
    #[must_use]
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Returns the quantity still unallocated after distribution.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns whether the proposal passes the submission gate.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }
}

/// Applies the submission gate to a desired allocation set.
///
/// A proposal is submittable when it names at least one assignee, its
/// quantities do not sum past the total due, and it differs from the
/// persisted assignments. A task with no persisted assignments is always
/// submittable: "no assignment yet" is not "no change".
///
/// # Errors
///
/// Returns the specific [`AllocationDomainError`] describing the failed
/// gate condition.
pub fn validate_proposal(
    persisted: &[TaskAssignment],
    desired: &[Allocation],
    total_due: u32,
) -> Result<(), AllocationDomainError> {
    if desired.is_empty() {
        return Err(AllocationDomainError::EmptySelection);
    }

    let requested: u32 = desired.iter().map(Allocation::quantity).sum();
    if requested > total_due {
        return Err(AllocationDomainError::ExceedsTotal {
            allocated: requested,
            total: total_due,
        });
    }

    if !persisted.is_empty() && resolve_diff(persisted, desired).is_empty() {
        return Err(AllocationDomainError::Unchanged);
    }

    Ok(())
}
