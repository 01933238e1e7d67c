//! Allocator service orchestrating distribution, diffing, and persistence.

use crate::allocation::{
    domain::{
        Allocation, AllocationDomainError, AllocationProposal, Task, TaskAssignment, TaskId,
        TaskStatus, auto_distribute, completion_headroom, resolve_diff, validate_proposal,
    },
    ports::{AssignmentRepository, AssignmentRepositoryError},
};
use crate::events::{CacheInvalidationBus, StudioEvent};
use crate::identity::UserId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for allocation operations.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// Proposal validation failed.
    #[error(transparent)]
    Domain(#[from] AllocationDomainError),

    /// The task was absent at submission time. Fatal, not retried.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The acting user has no assignment on the task.
    #[error("user {user_id} is not assigned to task {task_id}")]
    NotAssigned {
        /// Task the completion was reported against.
        task_id: TaskId,
        /// The acting user.
        user_id: UserId,
    },

    /// A completion increment would push the task past its total due.
    #[error(
        "completion increment {requested} exceeds the remaining headroom; \
         at most {max_allowed} more images may be reported"
    )]
    CompletionExceedsHeadroom {
        /// The rejected increment.
        requested: u32,
        /// The maximum increment that would have been accepted.
        max_allowed: u32,
    },

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AssignmentRepositoryError),
}

/// Result type for allocator service operations.
pub type AllocationResult<T> = Result<T, AllocationError>;

/// Outcome of a committed allocation.
///
/// Carries the authoritative assignment list re-read from the store after
/// the last mutation, so callers get read-your-writes semantics instead of
/// having to evict and refetch on their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    operations_applied: usize,
    assignments: Vec<TaskAssignment>,
}

impl CommitOutcome {
    /// Returns how many create/update/delete operations were issued.
    #[must_use]
    pub const fn operations_applied(&self) -> usize {
        self.operations_applied
    }

    /// Returns the persisted assignments after the commit.
    #[must_use]
    pub fn assignments(&self) -> &[TaskAssignment] {
        &self.assignments
    }
}

/// Task assignment allocation service.
#[derive(Clone)]
pub struct TaskAssignmentAllocator<R, C>
where
    R: AssignmentRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    bus: Arc<CacheInvalidationBus>,
}

impl<R, C> TaskAssignmentAllocator<R, C>
where
    R: AssignmentRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new allocator service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>, bus: Arc<CacheInvalidationBus>) -> Self {
        Self {
            repository,
            clock,
            bus,
        }
    }

    async fn load_task(&self, task_id: TaskId) -> AllocationResult<Task> {
        self.repository
            .find_task(task_id)
            .await?
            .ok_or(AllocationError::TaskNotFound(task_id))
    }

    /// Builds an allocation proposal for the selected users.
    ///
    /// Already-assigned users keep their persisted quantity as a seed; the
    /// unallocated remainder is split evenly across the newly added users.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::TaskNotFound`] when the task is absent, or
    /// a repository error when the lookup fails.
    pub async fn propose(
        &self,
        task_id: TaskId,
        selection: &[UserId],
    ) -> AllocationResult<AllocationProposal> {
        let task = self.load_task(task_id).await?;
        let persisted = self.repository.assignments_for_task(task_id).await?;
        Ok(AllocationProposal::build(
            task.total_due(),
            selection,
            &persisted,
        ))
    }

    /// Discards seeds and re-splits the entire total across the selection.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::TaskNotFound`] when the task is absent, or
    /// a repository error when the lookup fails.
    pub async fn auto_distribute(
        &self,
        task_id: TaskId,
        selection: &[UserId],
    ) -> AllocationResult<Vec<Allocation>> {
        let task = self.load_task(task_id).await?;
        Ok(auto_distribute(task.total_due(), selection))
    }

    /// Commits a desired allocation set against the persisted assignments.
    ///
    /// Re-validates the submission gate, resolves the diff, and issues all
    /// removals, then all updates, then all additions. Operations are
    /// awaited one at a time: the store enforces a uniqueness constraint on
    /// (task, user), and an add issued before a stale remove completes could
    /// transiently violate it. A transport failure mid-diff leaves a partial
    /// application; the outcome's re-read and the next refetch reveal the
    /// true persisted state.
    ///
    /// An empty `desired` set removes every existing assignment.
    ///
    /// # Errors
    ///
    /// Returns a domain error when the gate rejects the proposal,
    /// [`AllocationError::TaskNotFound`] when the task is absent, or a
    /// repository error from any of the issued operations.
    pub async fn commit(
        &self,
        task_id: TaskId,
        desired: &[Allocation],
    ) -> AllocationResult<CommitOutcome> {
        let task = self.load_task(task_id).await?;
        let persisted = self.repository.assignments_for_task(task_id).await?;

        if desired.is_empty() {
            if persisted.is_empty() {
                return Err(AllocationDomainError::EmptySelection.into());
            }
        } else {
            validate_proposal(&persisted, desired, task.total_due())?;
        }

        let diff = resolve_diff(&persisted, desired);
        for assignment_id in diff.to_remove() {
            self.repository.delete_assignment(*assignment_id).await?;
        }
        for update in diff.to_update() {
            let Some(existing) = persisted
                .iter()
                .find(|assignment| assignment.id() == update.assignment_id())
            else {
                continue;
            };
            let mut changed = existing.clone();
            changed.set_allocated(update.quantity(), &*self.clock);
            self.repository.update_assignment(&changed).await?;
        }
        for allocation in diff.to_add() {
            let assignment = TaskAssignment::new(
                task_id,
                allocation.user_id(),
                allocation.quantity(),
                &*self.clock,
            );
            self.repository.create_assignment(&assignment).await?;
        }

        let assignments = self.repository.assignments_for_task(task_id).await?;
        tracing::info!(
            %task_id,
            operations = diff.operation_count(),
            "assignment diff applied"
        );
        self.bus
            .publish(&StudioEvent::TaskAssignmentChanged { task_id });

        Ok(CommitOutcome {
            operations_applied: diff.operation_count(),
            assignments,
        })
    }

    /// Assigns the given users to the task.
    ///
    /// Fast paths: an empty selection removes every existing assignment
    /// without a negotiation step, and a single user receives the task's
    /// full total due. Larger selections are seeded, distributed, and
    /// committed in one step.
    ///
    /// # Errors
    ///
    /// Propagates gate, not-found, and repository errors from
    /// [`Self::commit`].
    pub async fn assign_users(
        &self,
        task_id: TaskId,
        selection: &[UserId],
    ) -> AllocationResult<CommitOutcome> {
        let task = self.load_task(task_id).await?;
        match selection {
            [] => {
                let persisted = self.repository.assignments_for_task(task_id).await?;
                if persisted.is_empty() {
                    return Ok(CommitOutcome {
                        operations_applied: 0,
                        assignments: Vec::new(),
                    });
                }
                self.commit(task_id, &[]).await
            }
            [user] => {
                let full = [Allocation::new(*user, task.total_due())];
                self.commit(task_id, &full).await
            }
            _ => {
                let persisted = self.repository.assignments_for_task(task_id).await?;
                let proposal = AllocationProposal::build(task.total_due(), selection, &persisted);
                validate_proposal(&persisted, proposal.allocations(), task.total_due())?;
                self.commit(task_id, proposal.allocations()).await
            }
        }
    }

    /// Records additional completed images for one assignee.
    ///
    /// The increment is validated against the headroom left by every
    /// assignee's completed count immediately before submission, so
    /// cumulative over-completion is prevented without a global lock.
    /// Reaching the total due completes the task; the first reported
    /// progress moves a pending task to in-progress.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::NotAssigned`] when the user has no
    /// assignment on the task,
    /// [`AllocationError::CompletionExceedsHeadroom`] when the increment
    /// does not fit (carrying the maximum valid increment), or a repository
    /// error.
    pub async fn record_completion(
        &self,
        task_id: TaskId,
        user_id: UserId,
        increment: u32,
    ) -> AllocationResult<TaskAssignment> {
        let mut task = self.load_task(task_id).await?;
        let assignments = self.repository.assignments_for_task(task_id).await?;

        let Some(mine) = assignments
            .iter()
            .find(|assignment| assignment.user_id() == user_id)
        else {
            return Err(AllocationError::NotAssigned { task_id, user_id });
        };

        let max_allowed = completion_headroom(task.total_due(), &assignments);
        if increment > max_allowed {
            return Err(AllocationError::CompletionExceedsHeadroom {
                requested: increment,
                max_allowed,
            });
        }

        let mut updated = mine.clone();
        updated.add_completed(increment, &*self.clock);
        self.repository.update_assignment(&updated).await?;
        tracing::info!(%task_id, %user_id, increment, "completion recorded");

        let completed_total: u32 = assignments
            .iter()
            .map(TaskAssignment::completed)
            .sum::<u32>()
            .saturating_add(increment);
        let next_status = if completed_total >= task.total_due() {
            Some(TaskStatus::Completed)
        } else if increment > 0 && task.status() == TaskStatus::Todo {
            Some(TaskStatus::InProgress)
        } else {
            None
        };
        if let Some(status) = next_status.filter(|status| *status != task.status()) {
            task.set_status(status, &*self.clock);
            self.repository.update_task(&task).await?;
            self.bus.publish(&StudioEvent::TaskStatusChanged { task_id });
        }
        self.bus.publish(&StudioEvent::TaskUpdated { task_id });

        Ok(updated)
    }
}
