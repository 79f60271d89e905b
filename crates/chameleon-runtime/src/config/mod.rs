//! Configuration module for the Chameleon runtime.
//!
//! This module provides TOML-based configuration loading for the framework
//! core and typed per-plugin sections.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, LoadedConfig};
pub use schema::{
    ChameleonConfig, FrameworkConfig, LogFormat, LogLevel, LogOutput, LoggingConfig,
};
