//! Even-split distribution of image quantities across assignees.

use super::TaskAssignment;
use crate::identity::UserId;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// A per-user quantity within an allocation proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    user_id: UserId,
    quantity: u32,
}

impl Allocation {
    /// Creates an allocation of `quantity` images to `user_id`.
    #[must_use]
    pub const fn new(user_id: UserId, quantity: u32) -> Self {
        Self { user_id, quantity }
    }

    /// Returns the assignee identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the allocated image quantity.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Splits `total` evenly across `lanes`.
///
/// Every lane receives the floor share; the first `total mod lanes` lanes
/// receive one extra unit, so the returned quantities always sum to exactly
/// `total`. Lane order is the caller's selection order, which makes the
/// remainder placement a stable, documented tie-break rather than an
/// iteration accident.
#[must_use]
#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "floor division with explicit remainder placement is the distribution rule"
)]
pub fn even_split(total: u32, lanes: NonZeroU32) -> Vec<u32> {
    let lane_count = lanes.get();
    let base = total / lane_count;
    let extras = total % lane_count;
    (0..lane_count)
        .map(|lane| if lane < extras { base + 1 } else { base })
        .collect()
}

/// Seeds an allocation proposal from persisted assignments.
///
/// Users already assigned carry their persisted allocated quantity over as a
/// seed; newly selected users are unseeded. Output order follows the
/// selection order.
#[must_use]
pub fn seed_allocations(
    selection: &[UserId],
    persisted: &[TaskAssignment],
) -> Vec<(UserId, Option<u32>)> {
    selection
        .iter()
        .map(|user| {
            let seed = persisted
                .iter()
                .find(|assignment| assignment.user_id() == *user)
                .map(TaskAssignment::allocated);
            (*user, seed)
        })
        .collect()
}

/// Fills the unseeded entries of a seeded selection.
///
/// The unallocated remainder, `max(total - sum of seeds, 0)`, is split
/// across the unseeded users by the [`even_split`] rule; seeded users keep
/// their seeds. A fully seeded selection distributes nothing.
#[must_use]
pub fn distribute_remainder(total: u32, seeded: &[(UserId, Option<u32>)]) -> Vec<Allocation> {
    let pre_sum: u32 = seeded.iter().filter_map(|(_, seed)| *seed).sum();
    let remaining = total.saturating_sub(pre_sum);
    let unseeded_count = seeded.iter().filter(|(_, seed)| seed.is_none()).count();

    let mut shares = u32::try_from(unseeded_count)
        .ok()
        .and_then(NonZeroU32::new)
        .map_or_else(Vec::new, |lanes| even_split(remaining, lanes))
        .into_iter();

    seeded
        .iter()
        .map(|(user, seed)| {
            let quantity = seed.unwrap_or_else(|| shares.next().unwrap_or(0));
            Allocation::new(*user, quantity)
        })
        .collect()
}

/// Recomputes every selected user's quantity from scratch.
///
/// Discards any seeds and re-splits the entire `total` across the current
/// selection. An empty selection yields no allocations.
#[must_use]
pub fn auto_distribute(total: u32, selection: &[UserId]) -> Vec<Allocation> {
    u32::try_from(selection.len())
        .ok()
        .and_then(NonZeroU32::new)
        .map_or_else(Vec::new, |lanes| {
            even_split(total, lanes)
                .into_iter()
                .zip(selection)
                .map(|(quantity, user)| Allocation::new(*user, quantity))
                .collect()
        })
}

/// Maximum completion increment any assignee may still report.
///
/// The completed quantities of every assignment on the task, the calling
/// user's included, count against the task's total due.
#[must_use]
pub fn completion_headroom(total_due: u32, assignments: &[TaskAssignment]) -> u32 {
    let completed: u32 = assignments.iter().map(TaskAssignment::completed).sum();
    total_due.saturating_sub(completed)
}
