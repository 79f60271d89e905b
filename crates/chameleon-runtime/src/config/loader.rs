//! Configuration loader using figment.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. `chameleon.toml` from the first search path that has one
//! 3. Environment variables (`CHAMELEON_*`)
//! 4. Programmatic overrides
//!
//! The default search paths are the plugin data folder (when the host has
//! one), the current directory and `<user config dir>/chameleon`.
//!
//! # Environment Variable Mapping
//!
//! Environment variables use the `CHAMELEON_` prefix with `__` as separator:
//!
//! - `CHAMELEON_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `CHAMELEON_FRAMEWORK__LOG_EVENTS=true` → `framework.log_events = true`
//! - `CHAMELEON_PLUGINS__GREETER__MOTD=hi` → `plugins.greeter.motd = "hi"`
//!
//! # Example
//!
//! ```rust,ignore
//! use chameleon_runtime::config::ConfigLoader;
//!
//! let loaded = ConfigLoader::new()
//!     .search_path(&data_folder)
//!     .load()?;
//!
//! let motd: Option<MotdConfig> = loaded.plugin_section("greeter")?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::de::DeserializeOwned;
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::ChameleonConfig;

/// File name searched for in every search path.
pub const CONFIG_FILE_NAME: &str = "chameleon.toml";

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "CHAMELEON_";

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    overrides: Figment,
    search_paths: Vec<PathBuf>,
    config_file: Option<PathBuf>,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader reading `CHAMELEON_*` environment variables.
    pub fn new() -> Self {
        Self {
            overrides: Figment::new(),
            search_paths: Vec::new(),
            config_file: None,
            env_prefix: Some(ENV_PREFIX.to_string()),
        }
    }

    /// Adds a search path for `chameleon.toml`. Paths are tried in the order
    /// they were added.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds the current directory to the search paths.
    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    /// Adds `<user config dir>/chameleon` to the search paths.
    pub fn with_user_config_dir(self) -> Self {
        match dirs::config_dir() {
            Some(dir) => self.search_path(dir.join("chameleon")),
            None => self,
        }
    }

    /// Loads exactly this file instead of searching. A missing file is an error.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Reads environment variables with `prefix` instead of `CHAMELEON_`.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// Merges configuration programmatically, above every other source.
    pub fn merge(mut self, config: ChameleonConfig) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(config));
        self
    }

    /// Sets a single key programmatically, e.g. `("plugins.greeter.motd", "hi")`.
    pub fn set<V: serde::Serialize>(mut self, key: &str, value: V) -> Self {
        self.overrides = self.overrides.merge(Serialized::default(key, value));
        self
    }

    /// Loads the layered configuration.
    pub fn load(self) -> ConfigResult<LoadedConfig> {
        let figment = self.build_figment()?;
        let config: ChameleonConfig = figment.extract()?;

        debug!(
            logging_level = %config.logging.level,
            log_events = config.framework.log_events,
            "Configuration loaded successfully"
        );

        Ok(LoadedConfig { config, figment })
    }

    fn build_figment(self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(ChameleonConfig::default()));

        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = merge_config_file(figment, path)?;
        } else {
            figment = self.search_config_file(figment);
        }

        if let Some(prefix) = &self.env_prefix {
            trace!(prefix = %prefix, "Loading environment variables");
            figment = figment.merge(Env::prefixed(prefix).split("__"));
        }

        Ok(figment.merge(self.overrides))
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("chameleon"));
        }
        paths
    }

    fn search_config_file(&self, figment: Figment) -> Figment {
        for search_path in self.resolve_search_paths() {
            let path = search_path.join(CONFIG_FILE_NAME);
            if path.exists() {
                info!(path = %path.display(), "Loading configuration file");
                return figment.merge(Toml::file(path));
            }
        }
        warn!("No configuration file found, using defaults");
        figment
    }
}

fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "toml" => Ok(figment.merge(Toml::file(path))),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

// =============================================================================
// LoadedConfig
// =============================================================================

/// The typed framework configuration plus the layered source it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    config: ChameleonConfig,
    figment: Figment,
}

impl LoadedConfig {
    /// Built-in defaults with no other source.
    pub fn defaults() -> Self {
        let config = ChameleonConfig::default();
        Self {
            figment: Figment::from(Serialized::defaults(config.clone())),
            config,
        }
    }

    pub fn config(&self) -> &ChameleonConfig {
        &self.config
    }

    /// Extracts an arbitrary section by dotted key.
    ///
    /// Returns `Ok(None)` when no source defines the key.
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<Option<T>> {
        if !self.figment.contains(key) {
            return Ok(None);
        }
        Ok(Some(self.figment.extract_inner(key)?))
    }

    /// Extracts the `[plugins.<plugin_id>]` section.
    pub fn plugin_section<T: DeserializeOwned>(&self, plugin_id: &str) -> ConfigResult<Option<T>> {
        self.section(&format!("plugins.{plugin_id}"))
    }
}

// =============================================================================
// Tests
// =============================================================================
