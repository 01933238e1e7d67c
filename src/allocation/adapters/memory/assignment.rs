//! Thread-safe in-memory task and assignment store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::allocation::{
    domain::{AssignmentId, Task, TaskAssignment, TaskId},
    ports::{AssignmentRepository, AssignmentRepositoryError, AssignmentRepositoryResult},
};

/// Thread-safe in-memory assignment repository.
///
/// Enforces the (task, user) uniqueness constraint the allocator's
/// sequential diff application relies on.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssignmentRepository {
    state: Arc<RwLock<InMemoryAssignmentState>>,
}

#[derive(Debug, Default)]
struct InMemoryAssignmentState {
    tasks: HashMap<TaskId, Task>,
    assignments: HashMap<AssignmentId, TaskAssignment>,
    // Per-task assignment ids in creation order.
    task_index: HashMap<TaskId, Vec<AssignmentId>>,
}

impl InMemoryAssignmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> AssignmentRepositoryError {
    AssignmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Removes an assignment ID from a task's index, cleaning up empty entries.
fn remove_from_index(
    index: &mut HashMap<TaskId, Vec<AssignmentId>>,
    task_id: TaskId,
    assignment_id: AssignmentId,
) {
    if let Some(ids) = index.get_mut(&task_id) {
        ids.retain(|id| *id != assignment_id);
        if ids.is_empty() {
            index.remove(&task_id);
        }
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn store_task(&self, task: &Task) -> AssignmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(AssignmentRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> AssignmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(AssignmentRepositoryError::TaskNotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_task(&self, id: TaskId) -> AssignmentRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn assignments_for_task(
        &self,
        task_id: TaskId,
    ) -> AssignmentRepositoryResult<Vec<TaskAssignment>> {
        let state = self.state.read().map_err(poisoned)?;
        let assignments = state
            .task_index
            .get(&task_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.assignments.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(assignments)
    }

    async fn create_assignment(
        &self,
        assignment: &TaskAssignment,
    ) -> AssignmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.tasks.contains_key(&assignment.task_id()) {
            return Err(AssignmentRepositoryError::TaskNotFound(assignment.task_id()));
        }

        let duplicate_user = state
            .task_index
            .get(&assignment.task_id())
            .is_some_and(|ids| {
                ids.iter()
                    .filter_map(|id| state.assignments.get(id))
                    .any(|existing| existing.user_id() == assignment.user_id())
            });
        if duplicate_user {
            return Err(AssignmentRepositoryError::DuplicateAssignment {
                task_id: assignment.task_id(),
                user_id: assignment.user_id(),
            });
        }

        state
            .task_index
            .entry(assignment.task_id())
            .or_default()
            .push(assignment.id());
        state.assignments.insert(assignment.id(), assignment.clone());
        Ok(())
    }

    async fn update_assignment(
        &self,
        assignment: &TaskAssignment,
    ) -> AssignmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.assignments.contains_key(&assignment.id()) {
            return Err(AssignmentRepositoryError::AssignmentNotFound(
                assignment.id(),
            ));
        }
        state.assignments.insert(assignment.id(), assignment.clone());
        Ok(())
    }

    async fn delete_assignment(&self, id: AssignmentId) -> AssignmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let Some(removed) = state.assignments.remove(&id) else {
            return Err(AssignmentRepositoryError::AssignmentNotFound(id));
        };
        remove_from_index(&mut state.task_index, removed.task_id(), id);
        Ok(())
    }
}
