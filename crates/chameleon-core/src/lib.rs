//! # Chameleon Core
//!
//! The host-independent core of the Chameleon plugin framework.
//!
//! A plugin written against this crate runs unchanged on every supported
//! Minecraft server and proxy. The core defines what a user, an event and a
//! command look like; host adapters translate between those definitions and
//! the native API of their host.
//!
//! ## Architecture Layers
//!
//! ### Foundation Layer
//!
//! - **User Model**: capability hierarchy ([`ChatUser`], [`User`], [`ServerUser`], [`ProxyUser`])
//! - **Event Model**: mutable events ([`ChameleonEvent`], [`Cancellable`], [`UserEvent`])
//! - **Errors**: [`EventError`], [`TranslationError`], [`PlatformError`]
//!
//! ### Framework Layer
//!
//! - **Event Bus**: prioritized listener registry ([`EventBus`], [`Priority`])
//! - **Commands**: [`Command`], [`Context`], [`SubCommand`]
//!
//! ### Integration Layer
//!
//! - **Dispatcher contract**: [`PlatformEventDispatcher`], [`EventBridge`]
//! - **Command contract**: [`PlatformCommandManager`], [`CommandAdapter`]
//! - **Platform identity**: [`PlatformInfo`]
//!
//! ## Event Flow
//!
//! ```text
//! ┌──────────────┐     ┌────────────┐     ┌────────────┐     ┌──────────┐
//! │ Native event │────▶│ Dispatcher │────▶│  EventBus  │────▶│ Listener │
//! │   (host)     │◀────│ (adapter)  │     │   (core)   │────▶│ Listener │
//! └──────────────┘     └────────────┘     └────────────┘     └──────────┘
//!        ▲   reconcile: message, cancelled, disconnect
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use chameleon_core::{EventBus, Priority, UserConnectEvent};
//!
//! let bus = EventBus::new();
//!
//! bus.subscribe("bans", Priority::High, |event: &mut UserConnectEvent| {
//!     if is_banned(event.user().unique_id()) {
//!         event.cancel_with_reason("You are banned.");
//!     }
//! });
//! ```

// Architectural layers
pub mod foundation;
pub mod framework;
pub mod integration;

#[cfg(test)]
pub(crate) mod testing;

// Re-export foundation types
pub use foundation::{
    BoxError, Cancellable, ChameleonEvent, ChatUser, DEFAULT_DISCONNECT_REASON, EventError,
    EventResult, ListenerResult, PlatformError, PlatformResult, PlatformUserManager, ProxyUser,
    ProxyUserSwitchEvent, Server, ServerUser, ServerUserKickEvent, TranslationError,
    TranslationResult, User, UserChatEvent, UserConnectEvent, UserDisconnectEvent, UserEvent,
    UserManager, same_user,
};

// Re-export framework types
pub use framework::{
    COMMAND_ERROR_MESSAGE, Command, CommandInfo, CommandResult, Context,
    DEFAULT_PERMISSION_MESSAGE, EventBus, Permission, Priority, SubCommand, SubscriptionId,
    split_arguments,
};

// Re-export integration types
pub use integration::{
    CommandAdapter, CommandStatus, EventBridge, PlatformCommandManager, PlatformEventDispatcher,
    PlatformInfo, PlatformKind, reconcile_chat, reconcile_connect,
};

/// Prelude for common imports.
pub mod prelude {
    pub use super::foundation::*;
    pub use super::framework::{
        Command, CommandInfo, CommandResult, Context, EventBus, Permission, Priority, SubCommand,
    };
}
