//! Configuration schema definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration structure (`chameleon.toml`).
///
/// Plugin-specific sections live under `[plugins.<plugin id>]` and are read
/// through [`LoadedConfig::plugin_section`](super::LoadedConfig::plugin_section).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChameleonConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Framework core settings.
    #[serde(default)]
    pub framework: FrameworkConfig,
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    #[cfg(feature = "json-log")]
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether the core installs a subscriber at all. Hosts that already
    /// route `tracing` output can turn this off.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Log file, used when `output = "file"`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Per-module levels, e.g. `chameleon_core = "debug"`.
    #[serde(default)]
    pub filters: BTreeMap<String, LogLevel>,

    #[serde(default)]
    pub thread_ids: bool,

    /// Include file and line of the log call.
    #[serde(default)]
    pub file_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LogLevel::default(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
            filters: BTreeMap::new(),
            thread_ids: false,
            file_location: false,
        }
    }
}

// =============================================================================
// Framework
// =============================================================================

/// Framework core settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkConfig {
    /// Log every dispatched unified event at debug level.
    #[serde(default)]
    pub log_events: bool,

    /// Name reported by the console user.
    #[serde(default = "default_console_name")]
    pub console_name: String,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            log_events: false,
            console_name: default_console_name(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_console_name() -> String {
    "CONSOLE".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChameleonConfig::default();
        assert!(config.logging.enabled);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.framework.console_name, "CONSOLE");
        assert!(!config.framework.log_events);
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config: ChameleonConfig = serde_json::from_str(
            r#"{"logging": {"level": "debug", "filters": {"chameleon_core": "trace"}}}"#,
        )
        .unwrap();

        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.filters["chameleon_core"], LogLevel::Trace);
        assert_eq!(config.logging.output, LogOutput::Stdout);
        assert_eq!(config.framework, FrameworkConfig::default());
    }
}
