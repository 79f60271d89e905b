//! Logging setup for the Chameleon framework.
//!
//! Every crate logs through `tracing`. This module installs a
//! `tracing-subscriber` registry for hosts that do not already have one.
//! Installation is idempotent: the first core to initialize wins and later
//! attempts are ignored.
//!
//! # Configuration-Based Initialization
//!
//! ```rust,ignore
//! use chameleon_runtime::{config::ConfigLoader, logging};
//!
//! let loaded = ConfigLoader::new().load()?;
//! logging::init_from_config(&loaded.config().logging);
//! ```
//!
//! # Manual Initialization
//!
//! ```rust,ignore
//! use chameleon_runtime::logging::LoggingBuilder;
//!
//! LoggingBuilder::new()
//!     .with_level(tracing::Level::DEBUG)
//!     .directive("chameleon_core=trace")
//!     .init();
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::warn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LogOutput, LoggingConfig};

/// Initialize logging from a [`LoggingConfig`].
///
/// Does nothing when logging is disabled or a global subscriber is already set.
pub fn init_from_config(config: &LoggingConfig) {
    if !config.enabled {
        return;
    }
    let _ = LoggingBuilder::from_config(config).try_init();
}

/// A builder for configuring logging.
pub struct LoggingBuilder {
    level: tracing::Level,
    directives: Vec<String>,
    format: LogFormat,
    output: LogOutput,
    file_path: Option<PathBuf>,
    with_thread_ids: bool,
    with_file: bool,
    with_line_number: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self {
            level: tracing::Level::INFO,
            directives: Vec::new(),
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            file_path: None,
            with_thread_ids: false,
            with_file: false,
            with_line_number: false,
        }
    }

    /// Create a builder from a [`LoggingConfig`].
    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut builder = Self::new()
            .with_level(config.level.to_tracing_level())
            .format(config.format)
            .output(config.output)
            .with_thread_ids(config.thread_ids)
            .with_file(config.file_location)
            .with_line_number(config.file_location);

        builder.file_path.clone_from(&config.file_path);
        for (module, level) in &config.filters {
            builder = builder.directive(&format!("{module}={level}"));
        }
        builder
    }

    /// Set the global log level.
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = level;
        self
    }

    /// Add a filter directive such as `chameleon_core=debug`.
    pub fn directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Set the file written when the output is [`LogOutput::File`].
    pub fn file_path(mut self, path: PathBuf) -> Self {
        self.file_path = Some(path);
        self
    }

    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.with_thread_ids = enabled;
        self
    }

    pub fn with_file(mut self, enabled: bool) -> Self {
        self.with_file = enabled;
        self
    }

    pub fn with_line_number(mut self, enabled: bool) -> Self {
        self.with_line_number = enabled;
        self
    }

    /// `RUST_LOG` takes precedence over the configured level; directives are
    /// added on top of either. Invalid directives are skipped.
    fn build_filter(&self) -> EnvFilter {
        let base = self.level.to_string().to_lowercase();
        let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base));

        for directive in &self.directives {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(e) => warn!(directive = %directive, error = %e, "Ignoring invalid log directive"),
            }
        }
        filter
    }

    /// Initialize the logging system, ignoring failures.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Initialize the logging system, returning an error if a global
    /// subscriber is already installed.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let filter = self.build_filter();

        macro_rules! configure_layer {
            ($layer:expr) => {
                $layer
                    .with_thread_ids(self.with_thread_ids)
                    .with_file(self.with_file)
                    .with_line_number(self.with_line_number)
            };
        }

        macro_rules! init_with_writer {
            ($writer:expr) => {
                match self.format {
                    #[cfg(feature = "json-log")]
                    LogFormat::Json => tracing_subscriber::registry()
                        .with(fmt::layer().json().with_writer($writer))
                        .with(filter)
                        .try_init(),
                    LogFormat::Compact => tracing_subscriber::registry()
                        .with(configure_layer!(fmt::layer().compact().with_writer($writer)))
                        .with(filter)
                        .try_init(),
                    LogFormat::Full => tracing_subscriber::registry()
                        .with(configure_layer!(fmt::layer().with_writer($writer)))
                        .with(filter)
                        .try_init(),
                    LogFormat::Pretty => tracing_subscriber::registry()
                        .with(configure_layer!(fmt::layer().pretty().with_writer($writer)))
                        .with(filter)
                        .try_init(),
                }
            };
        }

        match (self.output, &self.file_path) {
            (LogOutput::Stdout, _) => init_with_writer!(std::io::stdout),
            (LogOutput::Stderr, _) => init_with_writer!(std::io::stderr),
            (LogOutput::File, Some(path)) => {
                let appender = tracing_appender::rolling::never(
                    path.parent().unwrap_or_else(|| Path::new(".")),
                    path.file_name()
                        .unwrap_or_else(|| OsStr::new("chameleon.log")),
                );
                init_with_writer!(appender)
            }
            (LogOutput::File, None) => {
                let result = init_with_writer!(std::io::stdout);
                warn!("File output requested but no file path configured, logging to stdout");
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_from_config() {
        let mut config = LoggingConfig {
            level: LogLevel::Debug,
            thread_ids: true,
            file_location: true,
            ..LoggingConfig::default()
        };
        config.filters.insert("chameleon_core".into(), LogLevel::Trace);

        let builder = LoggingBuilder::from_config(&config);
        assert_eq!(builder.level, tracing::Level::DEBUG);
        assert_eq!(builder.directives, vec!["chameleon_core=trace"]);
        assert!(builder.with_thread_ids);
        assert!(builder.with_file && builder.with_line_number);
    }

    #[test]
    fn test_init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            output: LogOutput::File,
            file_path: Some(dir.path().join("test.log")),
            ..LoggingConfig::default()
        };
        init_from_config(&config);
        init_from_config(&config);
        assert!(LoggingBuilder::new().try_init().is_err());
    }
}
