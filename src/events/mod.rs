//! Cache-invalidation events for the studio console.
//!
//! After a successful mutation, the mutating service publishes a domain
//! event on the [`CacheInvalidationBus`] so that any number of independent
//! view subscribers can refetch. The bus is an explicitly constructed,
//! dependency-injected instance: it is created at application start, handed
//! to services and subscribers, and torn down at shutdown. Subscribers
//! wrap their refetch callbacks in a [`Debouncer`] so refetch storms
//! collapse into a single fetch.

mod bus;
mod debounce;

pub use bus::{CacheInvalidationBus, EventBusError, EventKind, StudioEvent, SubscriptionId};
pub use debounce::Debouncer;

#[cfg(test)]
mod tests;
