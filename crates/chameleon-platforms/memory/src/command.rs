//! Command registration with the in-memory host.

use std::sync::Arc;

use chameleon_core::{
    Command, CommandAdapter, CommandStatus, PlatformCommandManager, PlatformError,
    PlatformResult, PlatformUserManager,
};
use parking_lot::Mutex;
use tracing::debug;

use crate::native::{MemoryHost, NativeCommand, NativeSender};
use crate::user::MemoryUserManager;

/// Owner tag of the native commands registered by the manager.
pub const COMMAND_OWNER: &str = "chameleon";

/// Native executor for one unified command.
struct MemoryCommand {
    adapter: CommandAdapter,
    users: Arc<MemoryUserManager>,
}

impl NativeCommand for MemoryCommand {
    fn execute(&self, sender: &NativeSender, args: &str) -> bool {
        let status = self.adapter.invoke(self.users.wrap_sender(sender), args);
        status == CommandStatus::Success
    }

    fn complete(&self, sender: &NativeSender, args: &str) -> Vec<String> {
        self.adapter
            .complete_as::<String>(self.users.wrap_sender(sender), args)
    }
}

/// Registers unified commands as native host commands.
pub struct MemoryCommandManager {
    host: MemoryHost,
    users: Arc<MemoryUserManager>,
    registered: Mutex<Vec<String>>,
}

impl MemoryCommandManager {
    pub fn new(host: MemoryHost, users: Arc<MemoryUserManager>) -> Self {
        Self {
            host,
            users,
            registered: Mutex::new(Vec::new()),
        }
    }
}

impl PlatformCommandManager for MemoryCommandManager {
    fn register(&self, command: Arc<dyn Command>) -> PlatformResult<()> {
        let info = command.info();
        let name = info.name().to_owned();
        let aliases = info.aliases().to_vec();

        let executor = MemoryCommand {
            adapter: CommandAdapter::new(command),
            users: Arc::clone(&self.users),
        };
        self.host
            .register_command(COMMAND_OWNER, &name, &aliases, Arc::new(executor))
            .map_err(|reason| PlatformError::CommandRegistration {
                name: name.clone(),
                reason,
            })?;

        debug!(command = %name, ?aliases, "Registered command");
        self.registered.lock().push(name);
        Ok(())
    }

    fn unregister(&self, name: &str) -> bool {
        let mut registered = self.registered.lock();
        let Some(index) = registered.iter().position(|n| n.eq_ignore_ascii_case(name)) else {
            return false;
        };
        let name = registered.remove(index);
        self.host.unregister_command(&name)
    }

    fn registered(&self) -> Vec<String> {
        self.registered.lock().clone()
    }
}
