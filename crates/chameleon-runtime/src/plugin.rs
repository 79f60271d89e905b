//! Plugin lifecycle trait and the context handed to plugins.
//!
//! A plugin is one type implementing [`ChameleonPlugin`]. The generated host
//! entry point constructs it through [`ChameleonBootstrap`](crate::ChameleonBootstrap)
//! and drives `on_enable` / `on_disable` from the host's own hooks.
//!
//! ```rust,ignore
//! use chameleon_runtime::prelude::*;
//!
//! pub struct Greeter;
//!
//! impl ChameleonPlugin for Greeter {
//!     fn create(_ctx: &PluginContext) -> Result<Self, BoxError> {
//!         Ok(Self)
//!     }
//!
//!     fn on_enable(&mut self, ctx: &PluginContext) -> Result<(), BoxError> {
//!         ctx.subscribe(Priority::Normal, |event: &mut UserConnectEvent| {
//!             event.user().send_message("Welcome!");
//!         });
//!         Ok(())
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chameleon_core::{
    BoxError, ChameleonEvent, Command, EventBus, ListenerResult, PlatformCommandManager,
    PlatformInfo, PlatformResult, Priority, SubscriptionId, UserManager,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{ChameleonConfig, ConfigResult, LoadedConfig};

// =============================================================================
// Plugin data
// =============================================================================

/// A dependency on another plugin, as declared in the plugin metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDependency {
    pub name: String,
    /// Soft dependencies only affect load order.
    #[serde(default)]
    pub soft: bool,
}

/// Metadata of the running plugin, passed in by the generated entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginData {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<PluginDependency>,
    /// Host-assigned folder for plugin files, if the host has one.
    #[serde(default)]
    pub data_folder: Option<PathBuf>,
}

impl PluginData {
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn with_data_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.data_folder = Some(folder.into());
        self
    }
}

// =============================================================================
// Plugin trait
// =============================================================================

/// A cross-platform plugin.
pub trait ChameleonPlugin: Send + 'static {
    /// Constructs the plugin. Runs once, before `on_enable`.
    fn create(ctx: &PluginContext) -> Result<Self, BoxError>
    where
        Self: Sized;

    /// Called when the host enables the plugin.
    fn on_enable(&mut self, ctx: &PluginContext) -> Result<(), BoxError> {
        let _ = ctx;
        Ok(())
    }

    /// Called when the host disables the plugin. Listeners and commands
    /// registered through the context are removed afterwards.
    fn on_disable(&mut self, ctx: &PluginContext) -> Result<(), BoxError> {
        let _ = ctx;
        Ok(())
    }
}

// =============================================================================
// PluginContext
// =============================================================================

struct ContextInner {
    data: PluginData,
    platform: PlatformInfo,
    bus: Arc<EventBus>,
    users: Arc<dyn UserManager>,
    commands: Arc<dyn PlatformCommandManager>,
    config: LoadedConfig,
}

/// Everything a plugin can reach: its metadata, the platform, the event bus,
/// users, commands and configuration.
///
/// Cloning is cheap. Listeners registered through the context are owned by
/// the plugin id and removed together when the plugin is disabled.
#[derive(Clone)]
pub struct PluginContext {
    inner: Arc<ContextInner>,
}

impl PluginContext {
    pub(crate) fn new(
        data: PluginData,
        platform: PlatformInfo,
        bus: Arc<EventBus>,
        users: Arc<dyn UserManager>,
        commands: Arc<dyn PlatformCommandManager>,
        config: LoadedConfig,
    ) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                data,
                platform,
                bus,
                users,
                commands,
                config,
            }),
        }
    }

    /// This plugin's metadata.
    pub fn data(&self) -> &PluginData {
        &self.inner.data
    }

    /// This plugin's id, also the owner of every listener it registers.
    pub fn plugin_id(&self) -> &str {
        &self.inner.data.id
    }

    pub fn data_folder(&self) -> Option<&Path> {
        self.inner.data.data_folder.as_deref()
    }

    pub fn platform(&self) -> &PlatformInfo {
        &self.inner.platform
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.inner.bus
    }

    pub fn users(&self) -> &Arc<dyn UserManager> {
        &self.inner.users
    }

    pub fn commands(&self) -> &Arc<dyn PlatformCommandManager> {
        &self.inner.commands
    }

    /// The framework configuration.
    pub fn settings(&self) -> &ChameleonConfig {
        self.inner.config.config()
    }

    /// Reads this plugin's `[plugins.<id>]` configuration section.
    pub fn config<T: DeserializeOwned>(&self) -> ConfigResult<Option<T>> {
        self.inner.config.plugin_section(self.plugin_id())
    }

    /// Registers a listener owned by this plugin.
    pub fn subscribe<E, F>(&self, priority: Priority, listener: F) -> SubscriptionId
    where
        E: ChameleonEvent,
        F: Fn(&mut E) + Send + Sync + 'static,
    {
        self.inner.bus.subscribe(self.plugin_id(), priority, listener)
    }

    /// Registers a fallible listener owned by this plugin.
    pub fn try_subscribe<E, F>(&self, priority: Priority, listener: F) -> SubscriptionId
    where
        E: ChameleonEvent,
        F: Fn(&mut E) -> ListenerResult + Send + Sync + 'static,
    {
        self.inner
            .bus
            .try_subscribe(self.plugin_id(), priority, listener)
    }

    /// Registers a command with the host.
    pub fn register_command(&self, command: impl Command + 'static) -> PlatformResult<()> {
        self.inner.commands.register(Arc::new(command))
    }
}

impl std::fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginContext")
            .field("plugin", &self.inner.data.id)
            .field("platform", &self.inner.platform.id)
            .finish_non_exhaustive()
    }
}
