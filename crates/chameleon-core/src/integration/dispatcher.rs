//! Platform event dispatcher contract.
//!
//! A host adapter owns exactly one [`PlatformEventDispatcher`]. It registers
//! one native listener per native event type of interest, and each of those
//! listeners follows the same four steps:
//!
//! ```text
//!   native event
//!        │
//!        ▼
//!   1. wrap participants ──► User / Server wrappers
//!   2. translate         ──► unified event (cancelled seeded from native)
//!   3. EventBridge::translate_and_dispatch ──► EventBus::dispatch
//!   4. reconcile         ──► write mutable fields back onto the native event,
//!                             or act on the user when the host has no cancel hook
//! ```
//!
//! [`EventBridge`] covers steps 2-3 and the logging around them;
//! [`reconcile_connect`] and [`reconcile_chat`] cover the reconciliation
//! shared by every host.
//!
//! One native event instance always maps to exactly one dispatch. Events are
//! never reordered, batched or deduplicated.

use std::sync::Arc;

use tracing::{debug, error};

use crate::foundation::error::{PlatformResult, TranslationResult};
use crate::foundation::event::{Cancellable, ChameleonEvent};
use crate::foundation::events::{UserChatEvent, UserConnectEvent};
use crate::framework::bus::EventBus;

/// Translates native host events into unified events.
pub trait PlatformEventDispatcher: Send + Sync {
    /// Registers every native listener. Called once when the plugin enables.
    fn register_listeners(&self) -> PlatformResult<()>;

    /// Removes every listener added by
    /// [`register_listeners`](Self::register_listeners). Calling it again, or
    /// before registration, does nothing.
    fn unregister_listeners(&self);
}

/// Translation and dispatch helper shared by native listeners.
#[derive(Debug, Clone)]
pub struct EventBridge {
    bus: Arc<EventBus>,
    platform: Arc<str>,
    log_events: bool,
}

impl EventBridge {
    pub fn new(bus: Arc<EventBus>, platform: &str) -> Self {
        Self {
            bus,
            platform: Arc::from(platform),
            log_events: false,
        }
    }

    /// Logs every dispatched event at debug level.
    pub fn with_event_logging(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Builds a unified event with `translate` and dispatches it.
    ///
    /// Returns the event after every listener ran. When translation fails the
    /// error is logged and `None` is returned; the caller must then leave the
    /// native event untouched.
    pub fn translate_and_dispatch<E, F>(&self, native: &'static str, translate: F) -> Option<E>
    where
        E: ChameleonEvent,
        F: FnOnce() -> TranslationResult<E>,
    {
        let mut event = match translate() {
            Ok(event) => event,
            Err(e) => {
                error!(platform = %self.platform, native, error = %e, "Failed to translate native event");
                return None;
            }
        };

        self.bus.dispatch(&mut event);

        if self.log_events {
            debug!(
                platform = %self.platform,
                native,
                event = event.event_name(),
                cancelled = event.as_cancellable().is_some_and(|c| c.is_cancelled()),
                "Dispatched event"
            );
        }

        Some(event)
    }
}

/// Applies a connect outcome.
///
/// Connect events fire after the connection is established, so a cancelled
/// event disconnects the user with its reason. Returns whether it did.
pub fn reconcile_connect(event: &UserConnectEvent) -> bool {
    if !event.is_cancelled() {
        return false;
    }
    event.user_handle().disconnect(event.disconnect_reason());
    true
}

/// Writes a chat outcome back onto the native event.
///
/// `set_message` is only called when a listener changed the text, and only
/// for modifiable events; `set_cancelled` receives the final flag when the
/// event is cancellable.
pub fn reconcile_chat(
    event: &UserChatEvent,
    original_message: &str,
    set_message: impl FnOnce(&str),
    set_cancelled: impl FnOnce(bool),
) {
    if event.is_modifiable() && event.message() != original_message {
        set_message(event.message());
    }
    if event.is_cancellable() {
        set_cancelled(event.is_cancelled());
    }
}
