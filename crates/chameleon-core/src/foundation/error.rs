//! Unified error types for the Chameleon core.
//!
//! Runtime-level errors (instantiation, configuration, lifecycle) are defined
//! in `chameleon-runtime`; generator errors live in `chameleon-codegen`.

use thiserror::Error;

/// Boxed error returned by listeners and command handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// =============================================================================
// Event Errors
// =============================================================================

/// Errors raised when a listener tries to mutate an event in a way the
/// originating platform does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The event cannot be cancelled on this platform.
    #[error("event '{event}' is not cancellable")]
    NotCancellable {
        /// Name of the event.
        event: &'static str,
    },

    /// The event payload cannot be modified on this platform.
    #[error("event '{event}' is not modifiable")]
    NotModifiable {
        /// Name of the event.
        event: &'static str,
    },
}

// =============================================================================
// Translation Errors
// =============================================================================

/// A native event could not be mapped onto a unified event.
///
/// Dispatchers treat this as a contract violation: it is logged, the unified
/// event is not dispatched and the native event is left untouched.
#[derive(Debug, Clone, Error)]
pub enum TranslationError {
    /// A field the unified event requires was absent on the native event.
    #[error("native event '{native}' is missing required field '{field}'")]
    MissingField {
        /// Native event type name.
        native: &'static str,
        /// Name of the missing field.
        field: &'static str,
    },

    /// The native participant could not be wrapped as the required user kind.
    #[error("native event '{native}' carries a participant that is not a {expected}")]
    UnexpectedParticipant {
        /// Native event type name.
        native: &'static str,
        /// Expected capability (e.g. "server user").
        expected: &'static str,
    },
}

// =============================================================================
// Platform Errors
// =============================================================================

/// Errors reported by host adapters while talking to the native platform.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// The host refused a listener registration.
    #[error("failed to register native listener for '{event}': {reason}")]
    ListenerRegistration {
        /// Native event type name.
        event: &'static str,
        /// Host-provided reason.
        reason: String,
    },

    /// The host refused a command registration.
    #[error("failed to register command '{name}': {reason}")]
    CommandRegistration {
        /// Command name.
        name: String,
        /// Host-provided reason.
        reason: String,
    },

    /// A required native object is not available.
    #[error("platform object '{0}' is unavailable")]
    Unavailable(&'static str),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for event mutations.
pub type EventResult<T> = Result<T, EventError>;

/// Result type for native event translation.
pub type TranslationResult<T> = Result<T, TranslationError>;

/// Result type for host adapter operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Result type returned by fallible listeners.
pub type ListenerResult = Result<(), BoxError>;
