//! Host adapter entry point.
//!
//! Each host adapter crate provides one [`Platform`] implementation. The
//! bootstrap asks it for the three host-specific components and wires them to
//! a fresh event bus.

use std::path::PathBuf;
use std::sync::Arc;

use chameleon_core::{
    EventBridge, PlatformCommandManager, PlatformEventDispatcher, PlatformInfo, PlatformResult,
    UserManager,
};

use crate::config::FrameworkConfig;

/// The host-specific parts of a framework core.
pub struct PlatformComponents {
    pub dispatcher: Box<dyn PlatformEventDispatcher>,
    pub users: Arc<dyn UserManager>,
    pub commands: Arc<dyn PlatformCommandManager>,
}

/// A host runtime the framework core can be bound to.
pub trait Platform: Send + Sync {
    /// Identity of the host.
    fn info(&self) -> PlatformInfo;

    /// Folder the host assigns to the plugin, searched for `chameleon.toml`.
    fn data_folder(&self) -> Option<PathBuf> {
        None
    }

    /// Creates the dispatcher, user manager and command manager.
    ///
    /// `bridge` is already bound to the core's event bus; native listeners
    /// dispatch through it.
    fn create_components(
        &self,
        bridge: EventBridge,
        config: &FrameworkConfig,
    ) -> PlatformResult<PlatformComponents>;
}
