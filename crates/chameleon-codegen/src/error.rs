//! Generator error types.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The two artifacts generated per plugin and platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// The host entry point source.
    Bootstrap,
    /// The host descriptor manifest.
    Descriptor,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bootstrap => f.write_str("bootstrap"),
            Self::Descriptor => f.write_str("descriptor"),
        }
    }
}

/// Errors raised while generating plugin artifacts.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// A metadata field failed validation.
    #[error("Invalid plugin metadata field '{field}': {reason}")]
    InvalidMetadata { field: &'static str, reason: String },

    /// The metadata file could not be read.
    #[error("Failed to read plugin metadata {path}: {source}")]
    MetadataRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The metadata file is not valid TOML for the expected schema.
    #[error("Failed to parse plugin metadata {path}: {source}")]
    MetadataParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A required build environment variable is not set.
    #[error("Environment variable {0} is not set")]
    MissingEnv(&'static str),

    /// An artifact could not be rendered.
    #[error("Failed to render {artifact} for {platform}: {reason}")]
    Render {
        artifact: Artifact,
        platform: &'static str,
        reason: String,
    },

    /// An artifact could not be written. No output is left for the plugin.
    #[error("Failed to write {artifact} to {path}: {source}")]
    Write {
        artifact: Artifact,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            field,
            reason: reason.into(),
        }
    }

    /// The artifact this error is about, if it is about one.
    pub fn artifact(&self) -> Option<Artifact> {
        match self {
            Self::Render { artifact, .. } | Self::Write { artifact, .. } => Some(*artifact),
            _ => None,
        }
    }
}

/// Result type for generator operations.
pub type CodegenResult<T> = Result<T, CodegenError>;
