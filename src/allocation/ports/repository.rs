//! Repository port for task and assignment persistence.
//!
//! This port is the allocator's mutation boundary. Implementations are
//! expected to enforce a uniqueness constraint on (task, user), which is
//! why the allocator issues diff operations strictly sequentially.

use crate::allocation::domain::{AssignmentId, Task, TaskAssignment, TaskId};
use crate::identity::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for assignment repository operations.
pub type AssignmentRepositoryResult<T> = Result<T, AssignmentRepositoryError>;

/// Task and assignment persistence contract.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store_task(&self, task: &Task) -> AssignmentRepositoryResult<()>;

    /// Persists changes to an existing task (status, quantities, due date).
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::TaskNotFound`] when the task
    /// does not exist.
    async fn update_task(&self, task: &Task) -> AssignmentRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_task(&self, id: TaskId) -> AssignmentRepositoryResult<Option<Task>>;

    /// Returns the assignments of a task, in creation order.
    async fn assignments_for_task(
        &self,
        task_id: TaskId,
    ) -> AssignmentRepositoryResult<Vec<TaskAssignment>>;

    /// Stores a new assignment.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::DuplicateAssignment`] when the
    /// task already has an assignment for the same user, and
    /// [`AssignmentRepositoryError::TaskNotFound`] when the owning task does
    /// not exist.
    async fn create_assignment(
        &self,
        assignment: &TaskAssignment,
    ) -> AssignmentRepositoryResult<()>;

    /// Persists changes to an existing assignment.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::AssignmentNotFound`] when the
    /// assignment does not exist.
    async fn update_assignment(
        &self,
        assignment: &TaskAssignment,
    ) -> AssignmentRepositoryResult<()>;

    /// Deletes an assignment.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::AssignmentNotFound`] when the
    /// assignment does not exist.
    async fn delete_assignment(&self, id: AssignmentId) -> AssignmentRepositoryResult<()>;
}

/// Errors returned by assignment repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AssignmentRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task already has an assignment for the user.
    #[error("task {task_id} already has an assignment for user {user_id}")]
    DuplicateAssignment {
        /// Owning task identifier.
        task_id: TaskId,
        /// Assignee identifier.
        user_id: UserId,
    },

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The assignment was not found.
    #[error("assignment not found: {0}")]
    AssignmentNotFound(AssignmentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AssignmentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
