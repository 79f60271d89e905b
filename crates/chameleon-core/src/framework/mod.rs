//! Framework layer - Event routing and commands.
//!
//! This module contains the host-independent processing pieces:
//! - Event bus with prioritized, owner-tagged listeners
//! - Unified command model with sub-commands and permissions
//! - Argument splitting for raw command input

pub mod bus;
pub mod command;
pub mod split;

pub use bus::{EventBus, Priority, SubscriptionId};
pub use command::{
    COMMAND_ERROR_MESSAGE, Command, CommandInfo, CommandResult, Context,
    DEFAULT_PERMISSION_MESSAGE, Permission, SubCommand,
};
pub use split::{split_arguments, split_for_completion};
