//! Platform command adapter.
//!
//! Hosts register an executor object per command. [`CommandAdapter`] is the
//! host-independent half of that executor: it splits raw input, builds a fresh
//! [`Context`] per call, routes through sub-commands first and always reports
//! [`CommandStatus::Success`] to the host. User-facing failures reach the
//! sender as chat messages instead.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{error, trace};

use crate::foundation::error::PlatformResult;
use crate::foundation::user::ChatUser;
use crate::framework::command::{COMMAND_ERROR_MESSAGE, Command, Context};
use crate::framework::split::{split_arguments, split_for_completion};

/// Status reported back to the host after an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
}

/// Registers unified commands with a host's command system.
pub trait PlatformCommandManager: Send + Sync {
    /// Registers `command` under its name and aliases.
    fn register(&self, command: Arc<dyn Command>) -> PlatformResult<()>;

    /// Removes the command registered as `name`. Returns whether it existed.
    fn unregister(&self, name: &str) -> bool;

    /// Names of the commands registered through this manager.
    fn registered(&self) -> Vec<String>;

    /// Removes every command registered through this manager.
    fn unregister_all(&self) -> usize {
        self.registered()
            .iter()
            .filter(|name| self.unregister(name))
            .count()
    }
}

/// Host-independent executor for one unified command.
#[derive(Clone)]
pub struct CommandAdapter {
    command: Arc<dyn Command>,
}

impl CommandAdapter {
    pub fn new(command: Arc<dyn Command>) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &Arc<dyn Command> {
        &self.command
    }

    pub fn name(&self) -> &str {
        self.command.info().name()
    }

    /// Runs the command for `sender` with the raw argument string.
    ///
    /// Tries `args[0]` as a sub-command label with the remaining arguments and
    /// falls back to the base command with all arguments when no sub-command
    /// matched (or there are no arguments).
    pub fn invoke(&self, sender: Arc<dyn ChatUser>, raw_args: &str) -> CommandStatus {
        let args = split_arguments(raw_args);
        let command = &*self.command;
        trace!(command = self.name(), sender = %sender.name(), ?args, "Invoking command");

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let fall_back = match args.split_first() {
                None => true,
                Some((label, rest)) => {
                    let ctx = Context::new(Arc::clone(&sender), rest.to_vec(), command);
                    command.execute_sub_command(&ctx, label)
                }
            };
            if fall_back {
                command.execute_command(&Context::new(Arc::clone(&sender), args.clone(), command));
            }
        }));

        if outcome.is_err() {
            error!(command = self.name(), sender = %sender.name(), "Command panicked");
            sender.send_message(COMMAND_ERROR_MESSAGE);
        }

        CommandStatus::Success
    }

    /// Completion suggestions for the raw, partially typed argument string.
    pub fn complete(&self, sender: Arc<dyn ChatUser>, raw_args: &str) -> Vec<String> {
        let args = split_for_completion(raw_args);
        let command = &*self.command;

        catch_unwind(AssertUnwindSafe(|| {
            command.tab_complete(&Context::new(Arc::clone(&sender), args, command))
        }))
        .unwrap_or_else(|_| {
            error!(command = self.name(), sender = %sender.name(), "Tab completion panicked");
            Vec::new()
        })
    }

    /// Like [`complete`](Self::complete), mapped into the host's completion type.
    pub fn complete_as<T: From<String>>(&self, sender: Arc<dyn ChatUser>, raw_args: &str) -> Vec<T> {
        self.complete(sender, raw_args)
            .into_iter()
            .map(T::from)
            .collect()
    }
}

impl std::fmt::Debug for CommandAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandAdapter")
            .field("command", &self.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::command::{
        CommandInfo, CommandResult, DEFAULT_PERMISSION_MESSAGE, Permission, SubCommand,
    };
    use crate::testing::RecordingSender;
    use parking_lot::Mutex;

    struct Plugin {
        info: CommandInfo,
        subs: Vec<SubCommand>,
        executed: Mutex<Vec<Vec<String>>>,
    }

    impl Plugin {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                info: CommandInfo::new("plugin"),
                subs: vec![SubCommand::new("version", |ctx| {
                    ctx.reply("1.0.0");
                    Ok(())
                })],
                executed: Mutex::new(Vec::new()),
            })
        }
    }

    impl Command for Plugin {
        fn info(&self) -> &CommandInfo {
            &self.info
        }

        fn execute(&self, ctx: &Context<'_>) -> CommandResult {
            self.executed.lock().push(ctx.args().to_vec());
            if ctx.arg(0) == Some("fail") {
                return Err("failure".into());
            }
            if ctx.arg(0) == Some("panic") {
                panic!("command panic");
            }
            Ok(())
        }

        fn sub_commands(&self) -> &[SubCommand] {
            &self.subs
        }
    }

    #[test]
    fn test_no_args_runs_base_command() {
        let command = Plugin::new();
        let adapter = CommandAdapter::new(command.clone());

        let status = adapter.invoke(RecordingSender::new("Steve"), "");
        assert_eq!(status, CommandStatus::Success);
        assert_eq!(*command.executed.lock(), vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_unknown_sub_command_falls_back_with_all_args() {
        let command = Plugin::new();
        let adapter = CommandAdapter::new(command.clone());

        adapter.invoke(RecordingSender::new("Steve"), "reload now");
        assert_eq!(
            *command.executed.lock(),
            vec![vec!["reload".to_string(), "now".to_string()]]
        );
    }

    #[test]
    fn test_sub_command_handles_invocation() {
        let command = Plugin::new();
        let adapter = CommandAdapter::new(command.clone());
        let sender = RecordingSender::new("Steve");

        adapter.invoke(sender.clone(), "VERSION");
        assert!(command.executed.lock().is_empty());
        assert_eq!(sender.messages(), vec!["1.0.0"]);
    }

    #[test]
    fn test_failures_still_report_success() {
        let command = Plugin::new();
        let adapter = CommandAdapter::new(command);
        let sender = RecordingSender::new("Steve");

        assert_eq!(adapter.invoke(sender.clone(), "fail"), CommandStatus::Success);
        assert_eq!(adapter.invoke(sender.clone(), "panic"), CommandStatus::Success);
        assert_eq!(sender.messages(), vec![COMMAND_ERROR_MESSAGE, COMMAND_ERROR_MESSAGE]);
    }

    #[test]
    fn test_quoted_arguments() {
        let command = Plugin::new();
        let adapter = CommandAdapter::new(command.clone());

        adapter.invoke(RecordingSender::new("Steve"), r#"say "hello world""#);
        assert_eq!(
            *command.executed.lock(),
            vec![vec!["say".to_string(), "hello world".to_string()]]
        );
    }

    struct Gated {
        info: CommandInfo,
        subs: Vec<SubCommand>,
    }

    impl Command for Gated {
        fn info(&self) -> &CommandInfo {
            &self.info
        }

        fn execute(&self, ctx: &Context<'_>) -> CommandResult {
            ctx.reply("BASE");
            Ok(())
        }

        fn sub_commands(&self) -> &[SubCommand] {
            &self.subs
        }
    }

    #[test]
    fn test_command_permission_guards_sub_commands() {
        let adapter = CommandAdapter::new(Arc::new(Gated {
            info: CommandInfo::new("admin").permission(Permission::new("admin.use")),
            subs: vec![SubCommand::new("wipe", |ctx| {
                ctx.reply("WIPED");
                Ok(())
            })],
        }));

        let guest = RecordingSender::new("Guest");
        adapter.invoke(guest.clone(), "wipe");
        assert_eq!(guest.messages(), vec![DEFAULT_PERMISSION_MESSAGE]);
        assert!(adapter.complete(guest.clone(), "wi").is_empty());

        let admin = RecordingSender::new("Admin").grant("admin.use");
        adapter.invoke(admin.clone(), "wipe");
        assert_eq!(admin.messages(), vec!["WIPED"]);
        assert_eq!(adapter.complete(admin, "wi"), vec!["wipe"]);
    }

    #[derive(Debug, PartialEq)]
    struct Suggestion(String);

    impl From<String> for Suggestion {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    #[test]
    fn test_completion_maps_to_host_type() {
        let adapter = CommandAdapter::new(Plugin::new());

        let suggestions: Vec<Suggestion> = adapter.complete_as(RecordingSender::new("Steve"), "ve");
        assert_eq!(suggestions, vec![Suggestion("version".into())]);

        assert_eq!(adapter.complete(RecordingSender::new("Steve"), ""), vec!["version"]);
        assert!(adapter.complete(RecordingSender::new("Steve"), "version ").is_empty());
    }
}
