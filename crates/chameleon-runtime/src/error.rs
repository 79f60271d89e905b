//! Runtime error types.

use chameleon_core::{BoxError, PlatformError};
use thiserror::Error;

use crate::chameleon::LifecycleState;
use crate::config::ConfigError;

/// The framework core could not be constructed.
///
/// Returned by [`ChameleonBootstrap::load`](crate::ChameleonBootstrap::load);
/// generated host entry points log it and leave the plugin inert.
#[derive(Error, Debug)]
pub enum InstantiationError {
    /// Configuration could not be loaded.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// The host adapter could not create its components.
    #[error("Failed to initialize platform '{platform}': {source}")]
    Platform {
        platform: String,
        #[source]
        source: PlatformError,
    },

    /// The plugin constructor returned an error.
    #[error("Failed to construct plugin '{plugin}': {source}")]
    Plugin {
        plugin: String,
        #[source]
        source: BoxError,
    },

    /// The plugin constructor panicked.
    #[error("Plugin '{plugin}' panicked during construction: {message}")]
    Panicked { plugin: String, message: String },
}

/// A lifecycle transition was not allowed or failed.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The transition is not valid from the current state.
    #[error("Cannot {operation} plugin in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: LifecycleState,
    },

    /// Registering native listeners failed.
    #[error("Failed to register platform listeners: {0}")]
    Platform(#[from] PlatformError),

    /// The plugin's own enable or disable hook failed.
    #[error("Plugin '{plugin}' failed to {operation}: {message}")]
    Plugin {
        plugin: String,
        operation: &'static str,
        message: String,
    },
}

/// Result type for instantiation.
pub type InstantiationResult<T> = Result<T, InstantiationError>;

/// Result type for lifecycle transitions.
pub type LifecycleResult<T> = Result<T, LifecycleError>;
