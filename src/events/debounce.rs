//! Debounced refetch callbacks for bus subscribers.

use super::bus::{CacheInvalidationBus, EventBusError, EventKind, SubscriptionId};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Collapses rapid triggers into a single delayed action.
///
/// Every trigger cancels the pending timer and reschedules, so the action
/// runs once, one window after the last trigger. This bounds refetch
/// storms when several mutations fire in quick succession, such as a bulk
/// reassignment issuing a run of create/update/delete calls.
pub struct Debouncer {
    window: Duration,
    action: Arc<dyn Fn() + Send + Sync>,
    runtime: Handle,
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Debouncer {
    /// Default debounce window applied to refetch subscribers.
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

    /// Creates a debouncer running `action` one `window` after the last
    /// trigger.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime; the timer tasks are
    /// spawned onto the runtime that created the debouncer.
    #[must_use]
    pub fn new(window: Duration, action: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            window,
            action: Arc::new(action),
            runtime: Handle::current(),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Creates a debouncer with the default 500 ms window.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn with_default_window(action: impl Fn() + Send + Sync + 'static) -> Self {
        Self::new(Self::DEFAULT_WINDOW, action)
    }

    /// Schedules the action, cancelling any pending schedule.
    pub fn trigger(&self) {
        let Ok(mut pending) = self.pending.lock() else {
            return;
        };
        if let Some(timer) = pending.take() {
            timer.abort();
        }

        let action = Arc::clone(&self.action);
        let slot = Arc::clone(&self.pending);
        let window = self.window;
        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(window).await;
            action();
            if let Ok(mut finished) = slot.lock() {
                finished.take();
            }
        }));
    }

    /// Cancels the pending schedule, if any.
    pub fn cancel(&self) {
        if let Ok(mut pending) = self.pending.lock()
            && let Some(timer) = pending.take()
        {
            timer.abort();
        }
    }

    /// Returns whether an action is currently scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.lock().is_ok_and(|pending| pending.is_some())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("window", &self.window)
            .field("is_pending", &self.is_pending())
            .finish()
    }
}

impl CacheInvalidationBus {
    /// Subscribes a debounced refetch to one event kind.
    ///
    /// The payload is deliberately dropped: a debounced subscriber refetches
    /// its whole view, so only the fact that something changed matters.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`CacheInvalidationBus::subscribe`].
    pub fn subscribe_debounced(
        &self,
        kind: EventKind,
        debouncer: Arc<Debouncer>,
    ) -> Result<SubscriptionId, EventBusError> {
        self.subscribe(kind, move |_event| debouncer.trigger())
    }
}
