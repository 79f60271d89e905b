//! Foundation layer - Core abstractions and type system.
//!
//! This module contains the fundamental building blocks of the Chameleon framework:
//! - User capability hierarchy shared by every host
//! - Event model with cancellation and type-erased downcasting
//! - Built-in unified events
//! - Error types for events, translation and host adapters

pub mod error;
pub mod event;
pub mod events;
pub mod user;

pub use error::{
    BoxError, EventError, EventResult, ListenerResult, PlatformError, PlatformResult,
    TranslationError, TranslationResult,
};
pub use event::{Cancellable, ChameleonEvent, UserEvent};
pub use events::{
    DEFAULT_DISCONNECT_REASON, ProxyUserSwitchEvent, ServerUserKickEvent, UserChatEvent,
    UserConnectEvent, UserDisconnectEvent,
};
pub use user::{
    ChatUser, PlatformUserManager, ProxyUser, Server, ServerUser, User, UserManager, same_user,
};
