//! Transition service applying guard verdicts to persisted projects.

use crate::events::{CacheInvalidationBus, StudioEvent};
use crate::identity::UserId;
use crate::project::{
    domain::{
        Permission, Project, ProjectId, ProjectStatus, TransitionDecision, evaluate_transition,
        offerable_statuses,
    },
    ports::{PermissionOracle, ProjectRepository, ProjectRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for status transition operations.
///
/// Guard rejections are not errors; they are returned as
/// [`TransitionOutcome::Blocked`].
#[derive(Debug, Error)]
pub enum ProjectStatusError {
    /// The project was absent at submission time.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
}

/// Result type for status transition service operations.
pub type ProjectStatusResult<T> = Result<T, ProjectStatusError>;

/// Outcome of a requested status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The transition was applied; carries the updated project.
    Applied(Project),
    /// The guard blocked the transition.
    Blocked {
        /// Human-readable reason shown to the caller.
        reason: String,
    },
}

impl TransitionOutcome {
    /// Returns whether the transition was applied.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Returns the updated project when the transition was applied.
    #[must_use]
    pub const fn project(&self) -> Option<&Project> {
        match self {
            Self::Applied(project) => Some(project),
            Self::Blocked { .. } => None,
        }
    }

    /// Returns the rejection reason when the transition was blocked.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Applied(_) => None,
            Self::Blocked { reason } => Some(reason),
        }
    }
}

/// Project status transition service.
#[derive(Clone)]
pub struct ProjectStatusService<R, O, C>
where
    R: ProjectRepository,
    O: PermissionOracle,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    permissions: Arc<O>,
    clock: Arc<C>,
    bus: Arc<CacheInvalidationBus>,
}

impl<R, O, C> ProjectStatusService<R, O, C>
where
    R: ProjectRepository,
    O: PermissionOracle,
    C: Clock + Send + Sync,
{
    /// Creates a new transition service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        permissions: Arc<O>,
        clock: Arc<C>,
        bus: Arc<CacheInvalidationBus>,
    ) -> Self {
        Self {
            repository,
            permissions,
            clock,
            bus,
        }
    }

    async fn load_project(&self, project_id: ProjectId) -> ProjectStatusResult<Project> {
        self.repository
            .find_by_id(project_id)
            .await?
            .ok_or(ProjectStatusError::NotFound(project_id))
    }

    /// Returns the statuses offered as valid next targets for a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectStatusError::NotFound`] when the project is absent,
    /// or a repository error when the lookup fails.
    pub async fn offerable_statuses(
        &self,
        project_id: ProjectId,
    ) -> ProjectStatusResult<Vec<ProjectStatus>> {
        let project = self.load_project(project_id).await?;
        Ok(offerable_statuses(&project))
    }

    /// Requests a status transition on behalf of a user.
    ///
    /// Resolves the acting user's approve capability through the permission
    /// oracle, evaluates the per-target guard, and on approval persists the
    /// new status and publishes a project-updated event. A blocked
    /// transition is a first-class outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectStatusError::NotFound`] when the project is absent,
    /// or a repository error when persistence fails.
    pub async fn request_transition(
        &self,
        project_id: ProjectId,
        target: ProjectStatus,
        acting_user: UserId,
    ) -> ProjectStatusResult<TransitionOutcome> {
        let mut project = self.load_project(project_id).await?;
        let can_approve = self
            .permissions
            .has_permission(acting_user, Permission::ProjectApprove);

        match evaluate_transition(&project, target, can_approve) {
            TransitionDecision::Blocked { reason } => {
                tracing::warn!(%project_id, %target, %reason, "transition blocked");
                Ok(TransitionOutcome::Blocked { reason })
            }
            TransitionDecision::Allowed => {
                project.apply_status(target, &*self.clock);
                self.repository.update(&project).await?;
                tracing::info!(%project_id, %target, "status transition applied");
                self.bus
                    .publish(&StudioEvent::ProjectUpdated { project_id });
                Ok(TransitionOutcome::Applied(project))
            }
        }
    }
}
