//! The framework core bound to one plugin on one platform.
//!
//! ```text
//!            on_enable             on_disable
//!  Loaded ──────────────▶ Enabled ─────────────▶ Disabled
//! ```
//!
//! Enabling registers the platform's native listeners, then runs the
//! plugin's hook. Disabling runs the hook, then removes the native listeners,
//! every bus listener owned by the plugin and every command it registered.
//! Any other transition is rejected with [`LifecycleError::InvalidState`].

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use chameleon_core::{BoxError, PlatformEventDispatcher};
use tracing::{debug, error, info, info_span};

use crate::error::{LifecycleError, LifecycleResult};
use crate::plugin::{ChameleonPlugin, PluginContext};

/// Lifecycle position of a [`Chameleon`] core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Loaded,
    Enabled,
    Disabled,
}

/// A framework core instance.
pub struct Chameleon {
    context: PluginContext,
    plugin: Box<dyn ChameleonPlugin>,
    dispatcher: Box<dyn PlatformEventDispatcher>,
    state: LifecycleState,
}

impl Chameleon {
    pub(crate) fn new(
        context: PluginContext,
        plugin: Box<dyn ChameleonPlugin>,
        dispatcher: Box<dyn PlatformEventDispatcher>,
    ) -> Self {
        Self {
            context,
            plugin,
            dispatcher,
            state: LifecycleState::Loaded,
        }
    }

    pub fn context(&self) -> &PluginContext {
        &self.context
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Enables the plugin. Runs at most once.
    ///
    /// When the plugin's own hook fails the core still counts as enabled, so
    /// a later [`on_disable`](Self::on_disable) cleans up whatever the hook
    /// registered before failing.
    pub fn on_enable(&mut self) -> LifecycleResult<()> {
        if self.state != LifecycleState::Loaded {
            return Err(LifecycleError::InvalidState {
                operation: "enable",
                state: self.state,
            });
        }

        let span = info_span!(
            "enable",
            plugin = %self.context.plugin_id(),
            platform = %self.context.platform().id
        );
        let _enter = span.enter();

        if let Err(e) = self.dispatcher.register_listeners() {
            error!(error = %e, "Failed to register platform listeners");
            self.dispatcher.unregister_listeners();
            return Err(e.into());
        }
        self.state = LifecycleState::Enabled;

        let (plugin, context) = (&mut self.plugin, &self.context);
        let outcome = catch_unwind(AssertUnwindSafe(|| plugin.on_enable(context)));
        self.hook_result("enable", outcome)?;

        info!("Plugin enabled");
        Ok(())
    }

    /// Disables the plugin. Only valid after [`on_enable`](Self::on_enable).
    ///
    /// Cleanup runs even when the plugin's hook fails; the hook's error is
    /// returned afterwards.
    pub fn on_disable(&mut self) -> LifecycleResult<()> {
        if self.state != LifecycleState::Enabled {
            return Err(LifecycleError::InvalidState {
                operation: "disable",
                state: self.state,
            });
        }

        let span = info_span!(
            "disable",
            plugin = %self.context.plugin_id(),
            platform = %self.context.platform().id
        );
        let _enter = span.enter();

        let (plugin, context) = (&mut self.plugin, &self.context);
        let outcome = catch_unwind(AssertUnwindSafe(|| plugin.on_disable(context)));

        self.dispatcher.unregister_listeners();
        let listeners = self
            .context
            .event_bus()
            .unregister_all(self.context.plugin_id());
        let commands = self.context.commands().unregister_all();
        self.state = LifecycleState::Disabled;
        debug!(listeners, commands, "Removed plugin registrations");

        let result = self.hook_result("disable", outcome);
        info!("Plugin disabled");
        result
    }

    fn hook_result(
        &self,
        operation: &'static str,
        outcome: std::thread::Result<Result<(), BoxError>>,
    ) -> LifecycleResult<()> {
        let message = match outcome {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(e)) => e.to_string(),
            Err(panic) => format!("panicked: {}", panic_message(panic.as_ref())),
        };
        error!(operation, error = %message, "Plugin lifecycle hook failed");
        Err(LifecycleError::Plugin {
            plugin: self.context.plugin_id().to_string(),
            operation,
            message,
        })
    }
}

impl fmt::Debug for Chameleon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chameleon")
            .field("context", &self.context)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "<non-string panic payload>"
    }
}
