//! Built-in unified events.
//!
//! ```text
//! ChameleonEvent
//! ├── UserConnectEvent       cancellable with reason (cancel => disconnect)
//! ├── UserChatEvent          cancellable, message mutable
//! ├── UserDisconnectEvent
//! ├── ServerUserKickEvent    server platforms only
//! └── ProxyUserSwitchEvent   proxy platforms only
//! ```

use std::sync::Arc;

use crate::foundation::error::{EventError, EventResult};
use crate::foundation::event::{Cancellable, UserEvent, impl_chameleon_event};
use crate::foundation::user::{ProxyUser, Server, ServerUser, User};

/// Reason shown when a connect event is cancelled without an explicit reason.
pub const DEFAULT_DISCONNECT_REASON: &str = "Disconnected";

// ============================================================================
// Connect
// ============================================================================

/// Fired when a player has connected.
///
/// Most platforms fire this after the connection is established, so
/// cancelling it disconnects the player with [`cancel_reason`](Cancellable::cancel_reason).
pub struct UserConnectEvent {
    user: Arc<dyn User>,
    cancelled: bool,
    cancel_reason: Option<String>,
}

impl UserConnectEvent {
    /// Creates a connect event, seeding the cancelled flag from the platform.
    pub fn new(user: Arc<dyn User>, cancelled: bool) -> Self {
        Self {
            user,
            cancelled,
            cancel_reason: None,
        }
    }

    /// Shared handle to the connecting player.
    pub fn user_handle(&self) -> &Arc<dyn User> {
        &self.user
    }

    /// Cancels the connection, disconnecting the player with `reason`.
    pub fn cancel_with_reason(&mut self, reason: impl Into<String>) {
        self.cancelled = true;
        self.cancel_reason = Some(reason.into());
    }

    /// Sets the message shown when the connection is cancelled.
    pub fn set_cancel_reason(&mut self, reason: impl Into<String>) {
        self.cancel_reason = Some(reason.into());
    }

    /// The disconnect message to use, falling back to [`DEFAULT_DISCONNECT_REASON`].
    pub fn disconnect_reason(&self) -> &str {
        self.cancel_reason
            .as_deref()
            .unwrap_or(DEFAULT_DISCONNECT_REASON)
    }
}

impl Cancellable for UserConnectEvent {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) -> EventResult<()> {
        self.cancelled = cancelled;
        Ok(())
    }

    fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
    }
}

impl UserEvent for UserConnectEvent {
    fn user(&self) -> &dyn User {
        &*self.user
    }
}

impl_chameleon_event!(UserConnectEvent, "UserConnectEvent", cancellable);

// ============================================================================
// Chat
// ============================================================================

/// Fired when a player sends a chat message.
///
/// Some platforms cannot cancel or rewrite certain chat messages (for example
/// signed chat on proxies); such occurrences are flagged as not cancellable or
/// not modifiable and the corresponding setters return an error.
pub struct UserChatEvent {
    user: Arc<dyn User>,
    message: String,
    cancelled: bool,
    cancellable: bool,
    modifiable: bool,
}

impl UserChatEvent {
    /// Creates a chat event that can be both cancelled and modified.
    pub fn new(user: Arc<dyn User>, message: impl Into<String>, cancelled: bool) -> Self {
        Self::with_flags(user, message, cancelled, true, true)
    }

    /// Creates a chat event with explicit platform capabilities.
    pub fn with_flags(
        user: Arc<dyn User>,
        message: impl Into<String>,
        cancelled: bool,
        cancellable: bool,
        modifiable: bool,
    ) -> Self {
        Self {
            user,
            message: message.into(),
            cancelled,
            cancellable,
            modifiable,
        }
    }

    /// The current message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Replaces the message text.
    pub fn set_message(&mut self, message: impl Into<String>) -> EventResult<()> {
        if !self.modifiable {
            return Err(EventError::NotModifiable {
                event: "UserChatEvent",
            });
        }
        self.message = message.into();
        Ok(())
    }

    /// Whether the platform allows cancelling this message.
    pub fn is_cancellable(&self) -> bool {
        self.cancellable
    }

    /// Whether the platform allows rewriting this message.
    pub fn is_modifiable(&self) -> bool {
        self.modifiable
    }
}

impl Cancellable for UserChatEvent {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) -> EventResult<()> {
        if !self.cancellable {
            return Err(EventError::NotCancellable {
                event: "UserChatEvent",
            });
        }
        self.cancelled = cancelled;
        Ok(())
    }
}

impl UserEvent for UserChatEvent {
    fn user(&self) -> &dyn User {
        &*self.user
    }
}

impl_chameleon_event!(UserChatEvent, "UserChatEvent", cancellable);

// ============================================================================
// Disconnect
// ============================================================================

/// Fired when a player has disconnected.
pub struct UserDisconnectEvent {
    user: Arc<dyn User>,
}

impl UserDisconnectEvent {
    /// Creates a disconnect event.
    pub fn new(user: Arc<dyn User>) -> Self {
        Self { user }
    }
}

impl UserEvent for UserDisconnectEvent {
    fn user(&self) -> &dyn User {
        &*self.user
    }
}

impl_chameleon_event!(UserDisconnectEvent, "UserDisconnectEvent");

// ============================================================================
// Kick (server platforms)
// ============================================================================

/// Fired when a player is kicked from a server.
pub struct ServerUserKickEvent {
    user: Arc<dyn ServerUser>,
    reason: String,
}

impl ServerUserKickEvent {
    /// Creates a kick event.
    pub fn new(user: Arc<dyn ServerUser>, reason: impl Into<String>) -> Self {
        Self {
            user,
            reason: reason.into(),
        }
    }

    /// The kicked player.
    pub fn server_user(&self) -> &dyn ServerUser {
        &*self.user
    }

    /// The kick reason shown to the player.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl UserEvent for ServerUserKickEvent {
    fn user(&self) -> &dyn User {
        &*self.user
    }
}

impl_chameleon_event!(ServerUserKickEvent, "ServerUserKickEvent");

// ============================================================================
// Server switch (proxy platforms)
// ============================================================================

/// Fired when a proxied player has moved to a backend server.
pub struct ProxyUserSwitchEvent {
    user: Arc<dyn ProxyUser>,
    previous: Option<Arc<dyn Server>>,
    server: Arc<dyn Server>,
}

impl ProxyUserSwitchEvent {
    /// Creates a switch event. `previous` is `None` on the first connection.
    pub fn new(
        user: Arc<dyn ProxyUser>,
        previous: Option<Arc<dyn Server>>,
        server: Arc<dyn Server>,
    ) -> Self {
        Self {
            user,
            previous,
            server,
        }
    }

    /// The switching player.
    pub fn proxy_user(&self) -> &dyn ProxyUser {
        &*self.user
    }

    /// The server the player left, if this is not their first connection.
    pub fn previous_server(&self) -> Option<&dyn Server> {
        self.previous.as_deref()
    }

    /// The server the player is now connected to.
    pub fn server(&self) -> &dyn Server {
        &*self.server
    }
}

impl UserEvent for ProxyUserSwitchEvent {
    fn user(&self) -> &dyn User {
        &*self.user
    }
}

impl_chameleon_event!(ProxyUserSwitchEvent, "ProxyUserSwitchEvent");
