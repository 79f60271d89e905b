//! Event model for the Chameleon framework.
//!
//! This module provides the unified event infrastructure:
//!
//! - [`ChameleonEvent`] - Base trait for every event dispatched through the bus
//! - [`Cancellable`] - Events carrying a cancellation flag (and optional reason)
//! - [`UserEvent`] - Events whose subject is a connected player
//!
//! Events are plain mutable values. Listeners receive `&mut E` and edit the
//! event in place; the platform dispatcher reads the final state after every
//! listener ran and reconciles it with the native event.
//!
//! # Hierarchy
//!
//! Rust has no subclassing, so "listen to the base type" is expressed by
//! [`EventBus::subscribe_all`](crate::EventBus::subscribe_all), which hands
//! listeners a `&mut dyn ChameleonEvent`. Capability views such as
//! [`as_cancellable_mut`](ChameleonEvent::as_cancellable_mut) and
//! [`as_user_event`](ChameleonEvent::as_user_event) stand in for the
//! intermediate supertypes.

use std::any::Any;

use crate::foundation::error::EventResult;
use crate::foundation::user::User;

// ============================================================================
// Core Event Trait
// ============================================================================

/// The base trait for all unified events.
pub trait ChameleonEvent: Any + Send + Sync {
    /// Human-readable name of this event type, used in logs.
    fn event_name(&self) -> &'static str;

    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to self as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// View of this event's cancellation state, if it has one.
    fn as_cancellable(&self) -> Option<&dyn Cancellable> {
        None
    }

    /// Mutable view of this event's cancellation state, if it has one.
    fn as_cancellable_mut(&mut self) -> Option<&mut dyn Cancellable> {
        None
    }

    /// View of this event as a user event, if it has a player subject.
    fn as_user_event(&self) -> Option<&dyn UserEvent> {
        None
    }
}

impl dyn ChameleonEvent {
    /// Attempts to downcast to a concrete event type.
    pub fn downcast_ref<E: ChameleonEvent>(&self) -> Option<&E> {
        self.as_any().downcast_ref()
    }

    /// Attempts to mutably downcast to a concrete event type.
    pub fn downcast_mut<E: ChameleonEvent>(&mut self) -> Option<&mut E> {
        self.as_any_mut().downcast_mut()
    }

    /// Returns whether this event is cancellable and currently cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.as_cancellable().is_some_and(|c| c.is_cancelled())
    }
}

// ============================================================================
// Capability Traits
// ============================================================================

/// An event carrying a cancellation flag.
///
/// Cancelling does not stop dispatch: every listener still runs, and the
/// dispatcher acts on the value left after the last one.
pub trait Cancellable {
    /// Whether the event is currently cancelled.
    fn is_cancelled(&self) -> bool;

    /// Sets the cancellation flag.
    ///
    /// Returns [`EventError::NotCancellable`](crate::EventError::NotCancellable)
    /// when the originating platform cannot cancel this occurrence.
    fn set_cancelled(&mut self, cancelled: bool) -> EventResult<()>;

    /// Message shown to the user when cancellation results in a disconnect.
    fn cancel_reason(&self) -> Option<&str> {
        None
    }
}

/// An event whose subject is a connected player.
pub trait UserEvent {
    /// The player this event is about.
    fn user(&self) -> &dyn User;
}

/// Implements [`ChameleonEvent`] for a concrete event struct.
///
/// `cancellable` additionally wires the cancellation views to the type's
/// [`Cancellable`] implementation.
macro_rules! impl_chameleon_event {
    ($ty:ty, $name:literal) => {
        impl $crate::foundation::event::ChameleonEvent for $ty {
            fn event_name(&self) -> &'static str {
                $name
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn as_user_event(&self) -> Option<&dyn $crate::foundation::event::UserEvent> {
                Some(self)
            }
        }
    };
    ($ty:ty, $name:literal, cancellable) => {
        impl $crate::foundation::event::ChameleonEvent for $ty {
            fn event_name(&self) -> &'static str {
                $name
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn as_cancellable(&self) -> Option<&dyn $crate::foundation::event::Cancellable> {
                Some(self)
            }

            fn as_cancellable_mut(
                &mut self,
            ) -> Option<&mut dyn $crate::foundation::event::Cancellable> {
                Some(self)
            }

            fn as_user_event(&self) -> Option<&dyn $crate::foundation::event::UserEvent> {
                Some(self)
            }
        }
    };
}

pub(crate) use impl_chameleon_event;
