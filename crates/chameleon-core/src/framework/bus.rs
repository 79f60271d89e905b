//! Event bus for the Chameleon framework.
//!
//! This module provides the [`EventBus`], which keeps an ordered registry of
//! listeners and runs them against unified events.
//!
//! # Dispatch Rules
//!
//! When an event is dispatched:
//!
//! 1. Listeners registered for the event's concrete type, and listeners
//!    registered for every event through [`EventBus::subscribe_all`], are selected
//! 2. They run in ascending [`Priority`] order, registration order within a tier
//! 3. Every listener runs, even after one cancels the event
//! 4. A listener that returns an error or panics is logged and skipped; the
//!    next listener still runs and the caller never sees the failure
//!
//! ```rust,ignore
//! use chameleon_core::{EventBus, Priority, UserChatEvent};
//!
//! let bus = EventBus::new();
//!
//! bus.try_subscribe("my_plugin", Priority::Normal, |event: &mut UserChatEvent| {
//!     let upper = event.message().to_uppercase();
//!     event.set_message(upper)?;
//!     Ok(())
//! });
//!
//! let event = bus.dispatch(&mut chat_event);
//! ```
//!
//! # Thread Safety
//!
//! The registry sits behind a read/write lock. Dispatch takes a snapshot of
//! the matching listeners under the read lock and releases it before any
//! listener runs, so listeners may register or unregister without deadlocking
//! and concurrent dispatches on different host threads never wait on each other.

use std::any::{Any, TypeId};
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{Level, debug, error, span, trace};

use crate::foundation::error::ListenerResult;
use crate::foundation::event::ChameleonEvent;

// =============================================================================
// Priority
// =============================================================================

/// Listener priority tier. Lower tiers run first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Runs first.
    Lowest,
    /// Runs before normal listeners.
    Low,
    /// The default tier.
    #[default]
    Normal,
    /// Runs after normal listeners.
    High,
    /// Runs after high listeners.
    Highest,
    /// Runs last. Intended for observing the final state, not mutating it.
    Monitor,
}

// =============================================================================
// Subscriptions
// =============================================================================

/// Identifies a single listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type ErasedListener = Box<dyn Fn(&mut dyn ChameleonEvent) -> ListenerResult + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    owner: Arc<str>,
    priority: Priority,
    /// `None` subscribes to every event type.
    event_type: Option<TypeId>,
    event_type_name: &'static str,
    listener: ErasedListener,
}

impl Subscription {
    fn matches(&self, event_type: TypeId) -> bool {
        self.event_type.is_none_or(|t| t == event_type)
    }

    fn invoke(&self, event: &mut dyn ChameleonEvent) {
        let outcome = catch_unwind(AssertUnwindSafe(|| (self.listener)(&mut *event)));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(
                    event = event.event_name(),
                    owner = %self.owner,
                    listener = %self.id,
                    listens_to = self.event_type_name,
                    error = %e,
                    "Event listener returned an error"
                );
            }
            Err(panic) => {
                error!(
                    event = event.event_name(),
                    owner = %self.owner,
                    listener = %self.id,
                    listens_to = self.event_type_name,
                    panic = panic_message(panic.as_ref()),
                    "Event listener panicked"
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "<non-string panic payload>"
    }
}

// =============================================================================
// EventBus
// =============================================================================

/// Registry of event listeners, owned by one framework core instance.
///
/// The bus is explicitly constructed and passed to every component that
/// dispatches or registers; there is no global registry. Call
/// [`unregister_all`](Self::unregister_all) when an owner is disabled.
#[derive(Default)]
pub struct EventBus {
    /// Sorted by priority, then registration order.
    subscriptions: RwLock<Vec<Arc<Subscription>>>,
    next_id: AtomicU64,
}

impl EventBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an infallible listener for events of type `E`.
    ///
    /// The same closure logic may be registered several times; each
    /// registration runs once per dispatch.
    pub fn subscribe<E, F>(&self, owner: &str, priority: Priority, listener: F) -> SubscriptionId
    where
        E: ChameleonEvent,
        F: Fn(&mut E) + Send + Sync + 'static,
    {
        self.try_subscribe::<E, _>(owner, priority, move |event: &mut E| {
            listener(event);
            Ok(())
        })
    }

    /// Registers a fallible listener for events of type `E`.
    ///
    /// Errors are logged with the owner, listener and event type, and dispatch
    /// continues with the next listener.
    pub fn try_subscribe<E, F>(
        &self,
        owner: &str,
        priority: Priority,
        listener: F,
    ) -> SubscriptionId
    where
        E: ChameleonEvent,
        F: Fn(&mut E) -> ListenerResult + Send + Sync + 'static,
    {
        let erased = move |event: &mut dyn ChameleonEvent| match event.downcast_mut::<E>() {
            Some(event) => listener(event),
            None => Ok(()),
        };
        self.insert(
            owner,
            priority,
            Some(TypeId::of::<E>()),
            std::any::type_name::<E>(),
            Box::new(erased),
        )
    }

    /// Registers a listener for every event type (the base event type).
    pub fn subscribe_all<F>(&self, owner: &str, priority: Priority, listener: F) -> SubscriptionId
    where
        F: Fn(&mut dyn ChameleonEvent) -> ListenerResult + Send + Sync + 'static,
    {
        self.insert(owner, priority, None, "ChameleonEvent", Box::new(listener))
    }

    fn insert(
        &self,
        owner: &str,
        priority: Priority,
        event_type: Option<TypeId>,
        event_type_name: &'static str,
        listener: ErasedListener,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let subscription = Arc::new(Subscription {
            id,
            owner: Arc::from(owner),
            priority,
            event_type,
            event_type_name,
            listener,
        });

        let mut subscriptions = self.subscriptions.write();
        let position = subscriptions.partition_point(|s| s.priority <= priority);
        subscriptions.insert(position, subscription);

        trace!(owner, listener = %id, listens_to = event_type_name, ?priority, "Listener registered");
        id
    }

    /// Removes a single listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.write();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        before != subscriptions.len()
    }

    /// Removes every listener registered by `owner` and returns how many were
    /// removed. Listeners of other owners are untouched.
    pub fn unregister_all(&self, owner: &str) -> usize {
        let mut subscriptions = self.subscriptions.write();
        let before = subscriptions.len();
        subscriptions.retain(|s| &*s.owner != owner);
        let removed = before - subscriptions.len();
        debug!(owner, removed, "Unregistered listeners");
        removed
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Number of listeners registered by `owner`.
    pub fn listener_count_for(&self, owner: &str) -> usize {
        self.subscriptions
            .read()
            .iter()
            .filter(|s| &*s.owner == owner)
            .count()
    }

    /// Dispatches `event` to every matching listener and returns it.
    ///
    /// The returned reference is the one passed in, mutated by the listeners.
    pub fn dispatch<'e, E: ChameleonEvent>(&self, event: &'e mut E) -> &'e mut E {
        self.dispatch_dyn(&mut *event);
        event
    }

    /// Dispatches a type-erased event.
    pub fn dispatch_dyn(&self, event: &mut dyn ChameleonEvent) {
        let event_type = Any::type_id(event.as_any());
        let matching: Vec<Arc<Subscription>> = self
            .subscriptions
            .read()
            .iter()
            .filter(|s| s.matches(event_type))
            .cloned()
            .collect();

        let span = span!(Level::DEBUG, "dispatch", event = event.event_name());
        let _enter = span.enter();

        trace!(listeners = matching.len(), "Dispatching event");
        for subscription in &matching {
            subscription.invoke(event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::error::BoxError;
    use crate::foundation::event::Cancellable;
    use crate::foundation::error::EventResult;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Ping {
        log: Vec<&'static str>,
        cancelled: bool,
    }

    impl Cancellable for Ping {
        fn is_cancelled(&self) -> bool {
            self.cancelled
        }

        fn set_cancelled(&mut self, cancelled: bool) -> EventResult<()> {
            self.cancelled = cancelled;
            Ok(())
        }
    }

    impl ChameleonEvent for Ping {
        fn event_name(&self) -> &'static str {
            "Ping"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn as_cancellable(&self) -> Option<&dyn Cancellable> {
            Some(self)
        }

        fn as_cancellable_mut(&mut self) -> Option<&mut dyn Cancellable> {
            Some(self)
        }
    }

    struct Pong;

    impl ChameleonEvent for Pong {
        fn event_name(&self) -> &'static str {
            "Pong"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_dispatch_no_listeners() {
        let bus = EventBus::new();
        let mut event = Ping::default();
        let returned = bus.dispatch(&mut event);
        assert!(returned.log.is_empty());
    }

    #[test]
    fn test_priority_then_registration_order() {
        let bus = EventBus::new();
        bus.subscribe("a", Priority::High, |e: &mut Ping| e.log.push("high-1"));
        bus.subscribe("a", Priority::Low, |e: &mut Ping| e.log.push("low-1"));
        bus.subscribe("b", Priority::Normal, |e: &mut Ping| e.log.push("normal-1"));
        bus.subscribe("b", Priority::High, |e: &mut Ping| e.log.push("high-2"));
        bus.subscribe("a", Priority::Low, |e: &mut Ping| e.log.push("low-2"));
        bus.subscribe("c", Priority::Monitor, |e: &mut Ping| e.log.push("monitor"));
        bus.subscribe("c", Priority::Lowest, |e: &mut Ping| e.log.push("lowest"));

        let mut event = Ping::default();
        bus.dispatch(&mut event);

        assert_eq!(
            event.log,
            vec!["lowest", "low-1", "low-2", "normal-1", "high-1", "high-2", "monitor"]
        );
    }

    #[test]
    fn test_dispatch_returns_same_event() {
        let bus = EventBus::new();
        bus.subscribe("a", Priority::Normal, |e: &mut Ping| e.log.push("seen"));

        let mut event = Ping::default();
        let ptr: *const Ping = &event;
        let returned = bus.dispatch(&mut event);
        assert!(std::ptr::eq(ptr, returned));
        assert_eq!(event.log, vec!["seen"]);
    }

    #[test]
    fn test_cancel_does_not_short_circuit() {
        let bus = EventBus::new();
        bus.subscribe("a", Priority::Low, |e: &mut Ping| {
            e.cancelled = true;
            e.log.push("canceller");
        });
        bus.subscribe("a", Priority::Normal, |e: &mut Ping| e.log.push("after"));

        let mut event = Ping::default();
        bus.dispatch(&mut event);

        assert!(event.cancelled);
        assert_eq!(event.log, vec!["canceller", "after"]);
    }

    #[test]
    fn test_final_cancel_state_is_last_write() {
        let bus = EventBus::new();
        bus.subscribe("a", Priority::Low, |e: &mut Ping| e.cancelled = true);
        bus.subscribe("b", Priority::High, |e: &mut Ping| e.cancelled = false);

        let mut event = Ping::default();
        bus.dispatch(&mut event);
        assert!(!event.cancelled);
    }

    #[test]
    fn test_duplicate_registration_runs_twice() {
        let bus = EventBus::new();
        let listener = |e: &mut Ping| e.log.push("dup");
        bus.subscribe("a", Priority::Normal, listener);
        bus.subscribe("a", Priority::Normal, listener);

        let mut event = Ping::default();
        bus.dispatch(&mut event);
        assert_eq!(event.log, vec!["dup", "dup"]);
    }

    #[test]
    fn test_failing_listener_does_not_stop_dispatch() {
        let bus = EventBus::new();
        bus.subscribe("a", Priority::Low, |e: &mut Ping| e.log.push("before"));
        bus.try_subscribe("bad", Priority::Normal, |e: &mut Ping| {
            e.log.push("failing");
            Err(BoxError::from("listener failure"))
        });
        bus.subscribe("bad", Priority::Normal, |_: &mut Ping| panic!("listener panic"));
        bus.subscribe("a", Priority::High, |e: &mut Ping| e.log.push("after"));

        let mut event = Ping::default();
        bus.dispatch(&mut event);
        assert_eq!(event.log, vec!["before", "failing", "after"]);
    }

    #[test]
    fn test_listeners_only_see_their_event_type() {
        let bus = EventBus::new();
        let pongs = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&pongs);
        bus.subscribe("a", Priority::Normal, move |_: &mut Pong| *counter.lock() += 1);
        bus.subscribe("a", Priority::Normal, |e: &mut Ping| e.log.push("ping"));

        let mut ping = Ping::default();
        bus.dispatch(&mut ping);
        bus.dispatch(&mut Pong);

        assert_eq!(ping.log, vec!["ping"]);
        assert_eq!(*pongs.lock(), 1);
    }

    #[test]
    fn test_subscribe_all_receives_every_type() {
        let bus = EventBus::new();
        let names = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&names);
        bus.subscribe_all("observer", Priority::Monitor, move |event| {
            sink.lock().push(event.event_name());
            Ok(())
        });
        bus.subscribe_all("canceller", Priority::Normal, |event| {
            if let Some(cancellable) = event.as_cancellable_mut() {
                cancellable.set_cancelled(true)?;
            }
            Ok(())
        });

        let mut ping = Ping::default();
        bus.dispatch(&mut ping);
        bus.dispatch(&mut Pong);

        assert!(ping.cancelled);
        assert_eq!(*names.lock(), vec!["Ping", "Pong"]);
    }

    #[test]
    fn test_unregister_all_only_removes_owner() {
        let bus = EventBus::new();
        bus.subscribe("plugin_a", Priority::Normal, |e: &mut Ping| e.log.push("a"));
        bus.subscribe("plugin_b", Priority::Normal, |e: &mut Ping| e.log.push("b"));
        bus.subscribe("plugin_a", Priority::High, |e: &mut Ping| e.log.push("a2"));

        assert_eq!(bus.unregister_all("plugin_a"), 2);
        assert_eq!(bus.listener_count_for("plugin_a"), 0);
        assert_eq!(bus.listener_count_for("plugin_b"), 1);

        let mut event = Ping::default();
        bus.dispatch(&mut event);
        assert_eq!(event.log, vec!["b"]);
    }

    #[test]
    fn test_unsubscribe_single() {
        let bus = EventBus::new();
        let id = bus.subscribe("a", Priority::Normal, |e: &mut Ping| e.log.push("gone"));
        bus.subscribe("a", Priority::Normal, |e: &mut Ping| e.log.push("kept"));

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));

        let mut event = Ping::default();
        bus.dispatch(&mut event);
        assert_eq!(event.log, vec!["kept"]);
    }

    #[test]
    fn test_register_during_dispatch_does_not_deadlock() {
        let bus = Arc::new(EventBus::new());
        let inner = Arc::clone(&bus);
        bus.subscribe("a", Priority::Normal, move |e: &mut Ping| {
            inner.subscribe("late", Priority::Normal, |e: &mut Ping| e.log.push("late"));
            e.log.push("first");
        });

        let mut first = Ping::default();
        bus.dispatch(&mut first);
        assert_eq!(first.log, vec!["first"]);

        let mut second = Ping::default();
        bus.dispatch(&mut second);
        assert_eq!(second.log, vec!["first", "late"]);
    }

    #[test]
    fn test_concurrent_dispatch() {
        let bus = Arc::new(EventBus::new());
        let count = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&count);
        bus.subscribe("a", Priority::Normal, move |_: &mut Ping| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let bus = Arc::clone(&bus);
                scope.spawn(move || {
                    for _ in 0..100 {
                        bus.dispatch(&mut Ping::default());
                    }
                });
            }
        });

        assert_eq!(count.load(Ordering::SeqCst), 800);
    }
}
