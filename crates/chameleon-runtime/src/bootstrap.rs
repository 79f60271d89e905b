//! Construction of the framework core.
//!
//! Generated host entry points call [`ChameleonBootstrap::load`] from their
//! enable hook. Failures come back as an [`InstantiationError`] value so the
//! entry point can log them and stay inert instead of crashing the host's
//! plugin loader.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use chameleon_core::{EventBridge, EventBus};
use tracing::{error, info, info_span};

use crate::chameleon::{Chameleon, panic_message};
use crate::config::ConfigLoader;
use crate::error::{InstantiationError, InstantiationResult};
use crate::logging;
use crate::platform::Platform;
use crate::plugin::{ChameleonPlugin, PluginContext, PluginData};

/// Builds a [`Chameleon`] core for one plugin on one platform.
pub struct ChameleonBootstrap<P> {
    platform: P,
    data: PluginData,
    loader: Option<ConfigLoader>,
}

impl<P: Platform> ChameleonBootstrap<P> {
    pub fn new(platform: P, data: PluginData) -> Self {
        Self {
            platform,
            data,
            loader: None,
        }
    }

    /// Replaces the default configuration loader.
    ///
    /// The default searches the plugin data folder, the current directory and
    /// the user config directory, and reads `CHAMELEON_*` variables.
    pub fn config_loader(mut self, loader: ConfigLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Loads configuration, creates the platform components and constructs
    /// the plugin `T`.
    pub fn load<T: ChameleonPlugin>(self) -> InstantiationResult<Chameleon> {
        let Self {
            platform,
            mut data,
            loader,
        } = self;

        let info = platform.info();
        if data.data_folder.is_none() {
            data.data_folder = platform.data_folder();
        }

        let loader = loader.unwrap_or_else(|| {
            let mut loader = ConfigLoader::new();
            if let Some(folder) = &data.data_folder {
                loader = loader.search_path(folder);
            }
            loader.with_current_dir().with_user_config_dir()
        });
        let config = loader.load()?;
        logging::init_from_config(&config.config().logging);

        let span = info_span!("bootstrap", plugin = %data.id, platform = %info.id);
        let _enter = span.enter();

        let bus = Arc::new(EventBus::new());
        let framework = &config.config().framework;
        let bridge =
            EventBridge::new(Arc::clone(&bus), &info.id).with_event_logging(framework.log_events);

        let components = platform
            .create_components(bridge, framework)
            .map_err(|source| InstantiationError::Platform {
                platform: info.id.clone(),
                source,
            })?;

        let plugin_id = data.id.clone();
        let context = PluginContext::new(
            data,
            info,
            bus,
            components.users,
            components.commands,
            config,
        );

        let plugin = match catch_unwind(AssertUnwindSafe(|| T::create(&context))) {
            Ok(Ok(plugin)) => plugin,
            Ok(Err(source)) => {
                error!(error = %source, "Plugin construction failed");
                return Err(InstantiationError::Plugin {
                    plugin: plugin_id,
                    source,
                });
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref()).to_string();
                error!(panic = %message, "Plugin construction panicked");
                return Err(InstantiationError::Panicked {
                    plugin: plugin_id,
                    message,
                });
            }
        };

        info!(version = %context.data().version, "Plugin loaded");
        Ok(Chameleon::new(context, Box::new(plugin), components.dispatcher))
    }
}
