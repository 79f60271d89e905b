//! # Chameleon
//!
//! Write a Minecraft plugin once against one API and run it on every
//! supported server and proxy platform.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐     ┌─────────────┐     ┌────────────┐     ┌──────────┐     ┌────────┐
//! │   Host   │────▶│ Entry point │────▶│ Dispatcher │────▶│ EventBus │────▶│ Plugin │
//! │ (native) │◀────│ (generated) │◀────│  Commands  │     └──────────┘     └────────┘
//! └──────────┘     └─────────────┘     │   Users    │
//!                                      └────────────┘
//! ```
//!
//! - **Core**: event bus, user model, command model and adapter contracts
//! - **Runtime**: plugin lifecycle, bootstrap, configuration and logging
//! - **Platforms**: one adapter crate per host
//! - **Codegen**: build-time generation of host entry points and descriptors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chameleon::prelude::*;
//!
//! pub struct Greeter;
//!
//! impl ChameleonPlugin for Greeter {
//!     fn create(_ctx: &PluginContext) -> Result<Self, BoxError> {
//!         Ok(Self)
//!     }
//!
//!     fn on_enable(&mut self, ctx: &PluginContext) -> Result<(), BoxError> {
//!         ctx.subscribe(Priority::Normal, |event: &mut UserChatEvent| {
//!             let shouted = event.message().to_uppercase();
//!             let _ = event.set_message(shouted);
//!         });
//!         Ok(())
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - `platform-memory`: in-process host adapter
//! - `json-log`: JSON log output

pub use chameleon_core as core;
pub use chameleon_runtime as runtime;

#[cfg(feature = "platform-memory")]
pub use chameleon_platform_memory as memory;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use chameleon::prelude::*;
/// ```
pub mod prelude {
    // Lifecycle
    pub use chameleon_runtime::{ChameleonPlugin, PluginContext, PluginData};

    // Events
    pub use chameleon_core::{
        Cancellable, ChameleonEvent, Priority, ProxyUserSwitchEvent, ServerUserKickEvent,
        UserChatEvent, UserConnectEvent, UserDisconnectEvent, UserEvent,
    };

    // Users
    pub use chameleon_core::{ChatUser, ProxyUser, Server, ServerUser, User, UserManager};

    // Commands
    pub use chameleon_core::{Command, CommandInfo, CommandResult, Context, Permission, SubCommand};

    // Errors
    pub use chameleon_core::{BoxError, ListenerResult};

    pub use chameleon_runtime::tracing::{debug, error, info, trace, warn};
}
