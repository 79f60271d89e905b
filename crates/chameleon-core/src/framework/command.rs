//! Unified command model.
//!
//! A [`Command`] is immutable metadata ([`CommandInfo`], [`SubCommand`]s) plus
//! behaviour. Hosts never call a command directly; their adapter builds a
//! fresh [`Context`] per invocation and goes through
//! [`Command::execute_sub_command`] first, falling back to
//! [`Command::execute_command`] when no sub-command matched.
//!
//! # Example
//!
//! ```rust,ignore
//! struct Greet {
//!     info: CommandInfo,
//!     subs: Vec<SubCommand>,
//! }
//!
//! impl Greet {
//!     fn new() -> Self {
//!         Self {
//!             info: CommandInfo::new("greet").alias("hi"),
//!             subs: vec![SubCommand::new("reload", |ctx| {
//!                 ctx.reply("Reloaded.");
//!                 Ok(())
//!             })
//!             .permission(Permission::new("greet.reload"))],
//!         }
//!     }
//! }
//!
//! impl Command for Greet {
//!     fn info(&self) -> &CommandInfo {
//!         &self.info
//!     }
//!
//!     fn execute(&self, ctx: &Context<'_>) -> CommandResult {
//!         ctx.reply(format!("Hello, {}!", ctx.sender().name()));
//!         Ok(())
//!     }
//!
//!     fn sub_commands(&self) -> &[SubCommand] {
//!         &self.subs
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::foundation::error::BoxError;
use crate::foundation::user::ChatUser;

/// Message sent when a sender lacks a permission and none was configured.
pub const DEFAULT_PERMISSION_MESSAGE: &str = "You do not have permission to use this command.";

/// Message sent when a command handler fails.
pub const COMMAND_ERROR_MESSAGE: &str = "An internal error occurred while executing this command.";

/// Result type returned by command handlers.
pub type CommandResult = Result<(), BoxError>;

type SubCommandHandler = Arc<dyn Fn(&Context<'_>) -> CommandResult + Send + Sync>;
type SubCommandCompleter = Arc<dyn Fn(&Context<'_>) -> Vec<String> + Send + Sync>;

// =============================================================================
// Metadata
// =============================================================================

/// A permission node with the message shown when it is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    node: String,
    message: Option<String>,
}

impl Permission {
    pub fn new(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            message: None,
        }
    }

    /// Sets the denial message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    /// The denial message, falling back to [`DEFAULT_PERMISSION_MESSAGE`].
    pub fn denial_message(&self) -> &str {
        self.message.as_deref().unwrap_or(DEFAULT_PERMISSION_MESSAGE)
    }

    /// Checks `sender`, sending the denial message when the check fails.
    pub fn check(&self, sender: &dyn ChatUser) -> bool {
        if sender.has_permission(&self.node) {
            return true;
        }
        sender.send_message(self.denial_message());
        false
    }
}

/// Name, aliases and other static metadata of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    name: String,
    aliases: Vec<String>,
    description: Option<String>,
    usage: Option<String>,
    permission: Option<Permission>,
}

impl CommandInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: None,
            usage: None,
            permission: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn get_usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    pub fn get_permission(&self) -> Option<&Permission> {
        self.permission.as_ref()
    }
}

// =============================================================================
// Sub-commands
// =============================================================================

/// A named branch of a command, selected by the first argument.
#[derive(Clone)]
pub struct SubCommand {
    name: String,
    aliases: Vec<String>,
    permission: Option<Permission>,
    handler: SubCommandHandler,
    completer: Option<SubCommandCompleter>,
}

impl SubCommand {
    /// Creates a sub-command. The handler receives the arguments after the label.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Context<'_>) -> CommandResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            permission: None,
            handler: Arc::new(handler),
            completer: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    /// Sets the completion callback for arguments after the label.
    pub fn completer<F>(mut self, completer: F) -> Self
    where
        F: Fn(&Context<'_>) -> Vec<String> + Send + Sync + 'static,
    {
        self.completer = Some(Arc::new(completer));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn get_permission(&self) -> Option<&Permission> {
        self.permission.as_ref()
    }

    /// Case-insensitive match against the name and every alias.
    pub fn matches(&self, label: &str) -> bool {
        self.name.eq_ignore_ascii_case(label)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(label))
    }

    fn permitted(&self, sender: &dyn ChatUser) -> bool {
        self.permission
            .as_ref()
            .is_none_or(|p| sender.has_permission(p.node()))
    }
}

impl fmt::Debug for SubCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubCommand")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("permission", &self.permission)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Context
// =============================================================================

/// Per-invocation binding of sender, arguments and command.
///
/// Built fresh for every invocation and completion request, then dropped.
pub struct Context<'a> {
    sender: Arc<dyn ChatUser>,
    args: Vec<String>,
    command: &'a dyn Command,
}

impl<'a> Context<'a> {
    pub fn new(sender: Arc<dyn ChatUser>, args: Vec<String>, command: &'a dyn Command) -> Self {
        Self {
            sender,
            args,
            command,
        }
    }

    /// The sender who ran the command.
    pub fn sender(&self) -> &dyn ChatUser {
        &*self.sender
    }

    /// Shared handle to the sender.
    pub fn sender_handle(&self) -> &Arc<dyn ChatUser> {
        &self.sender
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn command(&self) -> &'a dyn Command {
        self.command
    }

    /// Sends `message` to the sender.
    pub fn reply(&self, message: impl AsRef<str>) {
        self.sender.send_message(message.as_ref());
    }

    /// A context for the same sender and command over `args`.
    pub fn with_args(&self, args: Vec<String>) -> Context<'a> {
        Context::new(Arc::clone(&self.sender), args, self.command)
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("sender", &self.sender.name())
            .field("args", &self.args)
            .field("command", &self.command.info().name())
            .finish()
    }
}

// =============================================================================
// Command
// =============================================================================

/// A host-independent command.
pub trait Command: Send + Sync {
    /// Static metadata.
    fn info(&self) -> &CommandInfo;

    /// Base command behaviour, run when no sub-command matched.
    fn execute(&self, ctx: &Context<'_>) -> CommandResult;

    /// Declared sub-commands.
    fn sub_commands(&self) -> &[SubCommand] {
        &[]
    }

    /// Suggestions for the current partial arguments.
    ///
    /// The default suggests permitted sub-command names for the first
    /// argument and defers to the sub-command's completer afterwards.
    fn tab_complete(&self, ctx: &Context<'_>) -> Vec<String> {
        if !permits(self.info(), ctx.sender()) {
            return Vec::new();
        }

        match ctx.args() {
            [] => sub_command_names(self.sub_commands(), ctx.sender(), ""),
            [partial] => sub_command_names(self.sub_commands(), ctx.sender(), partial),
            [label, rest @ ..] => self
                .sub_commands()
                .iter()
                .find(|sub| sub.matches(label) && sub.permitted(ctx.sender()))
                .and_then(|sub| sub.completer.as_ref())
                .map(|completer| completer(&ctx.with_args(rest.to_vec())))
                .unwrap_or_default(),
        }
    }

    /// Runs the base command after checking its permission.
    ///
    /// Handler failures are logged and reported to the sender.
    fn execute_command(&self, ctx: &Context<'_>) {
        if let Some(permission) = self.info().get_permission()
            && !permission.check(ctx.sender())
        {
            return;
        }

        if let Err(e) = self.execute(ctx) {
            warn!(command = self.info().name(), sender = %ctx.sender().name(), error = %e, "Command failed");
            ctx.reply(COMMAND_ERROR_MESSAGE);
        }
    }

    /// Runs the sub-command matching `label` with `ctx` holding the remaining
    /// arguments.
    ///
    /// Returns `true` when no sub-command matched, telling the caller to fall
    /// back to [`execute_command`](Self::execute_command). A matched
    /// sub-command counts as handled when the sender lacks either the
    /// command's permission or the sub-command's own.
    fn execute_sub_command(&self, ctx: &Context<'_>, label: &str) -> bool {
        let Some(sub) = self.sub_commands().iter().find(|sub| sub.matches(label)) else {
            return true;
        };

        let denied = [self.info().get_permission(), sub.get_permission()]
            .into_iter()
            .flatten()
            .any(|permission| !permission.check(ctx.sender()));
        if denied {
            return false;
        }

        if let Err(e) = (sub.handler)(ctx) {
            warn!(
                command = self.info().name(),
                sub_command = sub.name(),
                sender = %ctx.sender().name(),
                error = %e,
                "Sub-command failed"
            );
            ctx.reply(COMMAND_ERROR_MESSAGE);
        }
        false
    }
}

/// Silent permission check, used where no denial message belongs.
fn permits(info: &CommandInfo, sender: &dyn ChatUser) -> bool {
    info.get_permission()
        .is_none_or(|p| sender.has_permission(p.node()))
}

fn sub_command_names(subs: &[SubCommand], sender: &dyn ChatUser, partial: &str) -> Vec<String> {
    let partial = partial.to_ascii_lowercase();
    subs.iter()
        .filter(|sub| sub.permitted(sender))
        .filter(|sub| sub.name().to_ascii_lowercase().starts_with(&partial))
        .map(|sub| sub.name().to_owned())
        .collect()
}
