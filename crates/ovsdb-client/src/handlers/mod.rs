//! Notification consumers and the lock-guarded list that fans out to them.
//!
//! [`NotificationHandlers`] wraps a `Mutex` around the registered consumers.
//! Registration, removal and dispatch all take the same lock, so a consumer
//! registered before a dispatch begins is always invoked by it and one removed
//! before a dispatch begins never is. Consumers run synchronously while the
//! lock is held; they must return promptly and must not register or remove
//! consumers from inside a callback.
//!
//! A consumer that panics is logged and skipped. The remaining consumers
//! still receive the notification and the list stays usable.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ovsdb_core::TableUpdates;
use serde_json::Value;
use tracing::{debug, warn};

const HANDLERS_TARGET: &str = "ovsdb_client::handlers";

/// Consumer of server-pushed notifications.
///
/// Only `update` is required; the remaining notifications default to no-ops.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationHandler: Send + Sync {
    /// Receives one decoded `update` notification.
    ///
    /// `token` is the subscription token the monitor was registered with.
    fn update(&self, token: &Value, updates: &TableUpdates);

    /// The server granted a lock this client was waiting for.
    fn locked(&self, _lock_id: &str) {}

    /// Another client took a lock this client held.
    fn stolen(&self, _lock_id: &str) {}

    /// The connection to the server was closed.
    fn disconnected(&self) {}
}

/// Identity of one registration, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler-{}", self.0)
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(HandlerId, Arc<dyn NotificationHandler>)>,
}

/// Ordered list of notification consumers owned by one client.
#[derive(Default)]
pub struct NotificationHandlers {
    inner: Mutex<Registry>,
}

impl NotificationHandlers {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a consumer; it is invoked after every consumer registered
    /// before it.
    #[must_use]
    pub fn register(&self, handler: Arc<dyn NotificationHandler>) -> HandlerId {
        let mut registry = self.lock();
        let id = HandlerId(registry.next_id);
        registry.next_id += 1;
        registry.entries.push((id, handler));
        debug!(target: HANDLERS_TARGET, %id, total = registry.entries.len(), "handler registered");
        id
    }

    /// Removes a consumer, reporting whether it was registered.
    #[must_use]
    pub fn unregister(&self, id: HandlerId) -> bool {
        let mut registry = self.lock();
        let before = registry.entries.len();
        registry.entries.retain(|(entry, _)| *entry != id);
        let removed = registry.entries.len() != before;
        debug!(target: HANDLERS_TARGET, %id, removed, "handler unregistered");
        removed
    }

    /// Number of registered consumers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` when no consumer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn for_each<F>(&self, notification: &'static str, f: F) -> usize
    where
        F: Fn(&dyn NotificationHandler),
    {
        let registry = self.lock();
        for (id, handler) in &registry.entries {
            if panic::catch_unwind(AssertUnwindSafe(|| f(handler.as_ref()))).is_err() {
                warn!(target: HANDLERS_TARGET, %id, notification, "handler panicked");
            }
        }
        let count = registry.entries.len();
        debug!(target: HANDLERS_TARGET, notification, handlers = count, "notification dispatched");
        count
    }

    /// Delivers an update to every consumer in registration order, returning
    /// how many were invoked.
    #[must_use]
    pub fn dispatch_update(&self, token: &Value, updates: &TableUpdates) -> usize {
        self.for_each("update", |handler| handler.update(token, updates))
    }

    /// Delivers a `locked` notification to every consumer.
    #[must_use]
    pub fn dispatch_locked(&self, lock_id: &str) -> usize {
        self.for_each("locked", |handler| handler.locked(lock_id))
    }

    /// Delivers a `stolen` notification to every consumer.
    #[must_use]
    pub fn dispatch_stolen(&self, lock_id: &str) -> usize {
        self.for_each("stolen", |handler| handler.stolen(lock_id))
    }

    /// Tells every consumer the connection closed.
    #[must_use]
    pub fn dispatch_disconnected(&self) -> usize {
        self.for_each("disconnected", |handler| handler.disconnected())
    }
}

impl fmt::Debug for NotificationHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationHandlers")
            .field("handlers", &self.len())
            .finish()
    }
}
