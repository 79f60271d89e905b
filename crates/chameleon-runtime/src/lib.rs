//! Chameleon Runtime - Plugin lifecycle layer for the Chameleon framework.
//!
//! This crate provides:
//! - The plugin trait and the context handed to plugins (`ChameleonPlugin`, `PluginContext`)
//! - Framework core construction (`ChameleonBootstrap`) and lifecycle (`Chameleon`)
//! - The host adapter entry point (`Platform`)
//! - Configuration loading and logging setup
//!
//! # Bootstrapping
//!
//! Generated host entry points do the equivalent of:
//!
//! ```ignore
//! use chameleon_runtime::{ChameleonBootstrap, PluginData};
//!
//! let data = PluginData::new("greeter", "Greeter", "1.0.0");
//! match ChameleonBootstrap::new(platform, data).load::<Greeter>() {
//!     Ok(mut core) => {
//!         if let Err(e) = core.on_enable() {
//!             tracing::error!(error = %e, "Failed to enable plugin");
//!         }
//!     }
//!     Err(e) => tracing::error!(error = %e, "Failed to initialize plugin"),
//! }
//! ```

pub mod bootstrap;
pub mod chameleon;
pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod plugin;

// Re-exports
pub use bootstrap::ChameleonBootstrap;
pub use chameleon::{Chameleon, LifecycleState};
pub use config::{
    ChameleonConfig, ConfigError, ConfigLoader, ConfigResult, FrameworkConfig, LoadedConfig,
};
pub use error::{InstantiationError, InstantiationResult, LifecycleError, LifecycleResult};
pub use logging::LoggingBuilder;
pub use platform::{Platform, PlatformComponents};
pub use plugin::{ChameleonPlugin, PluginContext, PluginData, PluginDependency};

// Re-export tracing for use by generated entry points
pub use tracing;

/// Prelude module for plugin authors.
pub mod prelude {
    pub use super::{ChameleonPlugin, PluginContext, PluginData};
    pub use chameleon_core::prelude::*;
    pub use tracing::{debug, error, info, trace, warn};
}
