//! Process-wide publish/subscribe channel for cache invalidation.

use crate::allocation::domain::TaskId;
use crate::project::domain::ProjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// The fixed vocabulary of invalidation event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A project was created.
    ProjectCreated,
    /// A project was updated (including status transitions).
    ProjectUpdated,
    /// A project was deleted.
    ProjectDeleted,
    /// A task was created.
    TaskCreated,
    /// A task was updated (including completion reports).
    TaskUpdated,
    /// A task moved to another lifecycle status.
    TaskStatusChanged,
    /// A task's assignment set changed.
    TaskAssignmentChanged,
    /// A task was deleted.
    TaskDeleted,
    /// Several tasks were updated in one operation.
    BulkTasksUpdated,
    /// Every cached view must refetch.
    RefreshAll,
}

impl EventKind {
    /// Returns the canonical wire name of the event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectCreated => "project:created",
            Self::ProjectUpdated => "project:updated",
            Self::ProjectDeleted => "project:deleted",
            Self::TaskCreated => "task:created",
            Self::TaskUpdated => "task:updated",
            Self::TaskStatusChanged => "task:status_changed",
            Self::TaskAssignmentChanged => "task:assignment_changed",
            Self::TaskDeleted => "task:deleted",
            Self::BulkTasksUpdated => "tasks:bulk_updated",
            Self::RefreshAll => "refresh:all",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A published invalidation event with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StudioEvent {
    /// A project was created.
    ProjectCreated {
        /// The created project.
        project_id: ProjectId,
    },
    /// A project was updated (including status transitions).
    ProjectUpdated {
        /// The updated project.
        project_id: ProjectId,
    },
    /// A project was deleted.
    ProjectDeleted {
        /// The deleted project.
        project_id: ProjectId,
    },
    /// A task was created.
    TaskCreated {
        /// The created task.
        task_id: TaskId,
    },
    /// A task was updated (including completion reports).
    TaskUpdated {
        /// The updated task.
        task_id: TaskId,
    },
    /// A task moved to another lifecycle status.
    TaskStatusChanged {
        /// The task whose status changed.
        task_id: TaskId,
    },
    /// A task's assignment set changed.
    TaskAssignmentChanged {
        /// The task whose assignments changed.
        task_id: TaskId,
    },
    /// A task was deleted.
    TaskDeleted {
        /// The deleted task.
        task_id: TaskId,
    },
    /// Several tasks were updated in one operation.
    BulkTasksUpdated {
        /// The affected tasks.
        task_ids: Vec<TaskId>,
    },
    /// Every cached view must refetch.
    RefreshAll,
}

impl StudioEvent {
    /// Returns the event's name in the fixed vocabulary.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::ProjectCreated { .. } => EventKind::ProjectCreated,
            Self::ProjectUpdated { .. } => EventKind::ProjectUpdated,
            Self::ProjectDeleted { .. } => EventKind::ProjectDeleted,
            Self::TaskCreated { .. } => EventKind::TaskCreated,
            Self::TaskUpdated { .. } => EventKind::TaskUpdated,
            Self::TaskStatusChanged { .. } => EventKind::TaskStatusChanged,
            Self::TaskAssignmentChanged { .. } => EventKind::TaskAssignmentChanged,
            Self::TaskDeleted { .. } => EventKind::TaskDeleted,
            Self::BulkTasksUpdated { .. } => EventKind::BulkTasksUpdated,
            Self::RefreshAll => EventKind::RefreshAll,
        }
    }
}

/// Errors returned by the event bus.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EventBusError {
    /// The configured subscriber cap was reached.
    #[error("subscriber limit of {max} reached")]
    SubscriberLimitReached {
        /// The configured maximum subscriber count.
        max: usize,
    },

    /// The bus registry lock was poisoned.
    #[error("event bus registry lock poisoned")]
    Poisoned,
}

/// Handle identifying one subscription for later teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type EventHandler = Arc<dyn Fn(&StudioEvent) + Send + Sync>;

#[derive(Default)]
struct BusRegistry {
    next_id: u64,
    subscribers: HashMap<EventKind, Vec<(SubscriptionId, EventHandler)>>,
    count: usize,
}

/// Publish/subscribe channel notifying view subscribers of stale caches.
///
/// Fan-out is bounded by a configured maximum subscriber count. Handlers
/// run synchronously on the publishing thread, outside the registry lock,
/// so a handler may publish or subscribe without deadlocking.
pub struct CacheInvalidationBus {
    registry: Mutex<BusRegistry>,
    max_subscribers: usize,
}

impl CacheInvalidationBus {
    /// Default subscriber cap.
    pub const DEFAULT_MAX_SUBSCRIBERS: usize = 100;

    /// Creates a bus with the default subscriber cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_subscribers(Self::DEFAULT_MAX_SUBSCRIBERS)
    }

    /// Creates a bus with an explicit subscriber cap.
    #[must_use]
    pub fn with_max_subscribers(max_subscribers: usize) -> Self {
        Self {
            registry: Mutex::new(BusRegistry::default()),
            max_subscribers,
        }
    }

    /// Registers a handler for one event kind.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::SubscriberLimitReached`] when the cap is
    /// already met, or [`EventBusError::Poisoned`] when the registry lock
    /// was poisoned.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Result<SubscriptionId, EventBusError>
    where
        F: Fn(&StudioEvent) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock().map_err(|_| EventBusError::Poisoned)?;
        if registry.count >= self.max_subscribers {
            return Err(EventBusError::SubscriberLimitReached {
                max: self.max_subscribers,
            });
        }

        registry.next_id += 1;
        let id = SubscriptionId(registry.next_id);
        registry
            .subscribers
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));
        registry.count += 1;
        Ok(id)
    }

    /// Removes a subscription.
    ///
    /// Returns whether a subscription was actually removed; unsubscribing
    /// twice is a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let Ok(mut registry) = self.registry.lock() else {
            return false;
        };
        let mut removed = false;
        registry.subscribers.retain(|_, handlers| {
            let before = handlers.len();
            handlers.retain(|(handler_id, _)| *handler_id != id);
            removed |= handlers.len() < before;
            !handlers.is_empty()
        });
        if removed {
            registry.count -= 1;
        }
        removed
    }

    /// Publishes an event to every subscriber of its kind.
    ///
    /// Handlers are invoked after the registry lock is released, in
    /// subscription order.
    pub fn publish(&self, event: &StudioEvent) {
        let handlers: Vec<EventHandler> = {
            let Ok(registry) = self.registry.lock() else {
                return;
            };
            registry
                .subscribers
                .get(&event.kind())
                .map(|entries| entries.iter().map(|(_, handler)| Arc::clone(handler)).collect())
                .unwrap_or_default()
        };

        tracing::debug!(
            event = event.kind().as_str(),
            delivered = handlers.len(),
            "event published"
        );
        for handler in handlers {
            handler(event);
        }
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().map_or(0, |registry| registry.count)
    }
}

impl Default for CacheInvalidationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CacheInvalidationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheInvalidationBus")
            .field("max_subscribers", &self.max_subscribers)
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
