//! Integration layer - Contracts implemented by host adapters.
//!
//! This module contains the interfaces a host adapter fills in:
//! - Platform identity
//! - Native event translation and reconciliation
//! - Native command registration

pub mod command_adapter;
pub mod dispatcher;
pub mod platform;

pub use command_adapter::{CommandAdapter, CommandStatus, PlatformCommandManager};
pub use dispatcher::{EventBridge, PlatformEventDispatcher, reconcile_chat, reconcile_connect};
pub use platform::{PlatformInfo, PlatformKind};
