//! Task assignment records pairing a task with an assignee.

use super::{AssignmentId, TaskId};
use crate::identity::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A (task, user) pairing carrying allocated and completed image quantities.
///
/// Assignments are owned by their task; unassigning a user deletes the
/// record rather than zeroing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAssignment {
    id: AssignmentId,
    task_id: TaskId,
    user_id: UserId,
    allocated: u32,
    completed: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted assignment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAssignmentData {
    /// Persisted assignment identifier.
    pub id: AssignmentId,
    /// Owning task identifier.
    pub task_id: TaskId,
    /// Assignee identifier.
    pub user_id: UserId,
    /// Persisted allocated image quantity.
    pub allocated: u32,
    /// Persisted completed image quantity.
    pub completed: u32,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TaskAssignment {
    /// Creates a new assignment with no completed work.
    #[must_use]
    pub fn new(task_id: TaskId, user_id: UserId, allocated: u32, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: AssignmentId::new(),
            task_id,
            user_id,
            allocated,
            completed: 0,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an assignment from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedAssignmentData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            user_id: data.user_id,
            allocated: data.allocated,
            completed: data.completed,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the assignment identifier.
    #[must_use]
    pub const fn id(&self) -> AssignmentId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the assignee identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the allocated image quantity.
    #[must_use]
    pub const fn allocated(&self) -> u32 {
        self.allocated
    }

    /// Returns the completed image quantity.
    #[must_use]
    pub const fn completed(&self) -> u32 {
        self.completed
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the allocated quantity.
    pub fn set_allocated(&mut self, quantity: u32, clock: &impl Clock) {
        self.allocated = quantity;
        self.touch(clock);
    }

    /// Adds reported completed images to the running count.
    ///
    /// Headroom validation against the task total happens before the
    /// increment is accepted; see the allocator service.
    pub fn add_completed(&mut self, increment: u32, clock: &impl Clock) {
        self.completed = self.completed.saturating_add(increment);
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
