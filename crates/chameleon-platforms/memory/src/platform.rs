use std::path::PathBuf;
use std::sync::Arc;

use chameleon_core::{EventBridge, PlatformInfo, PlatformResult};
use chameleon_runtime::{FrameworkConfig, Platform, PlatformComponents};

use crate::command::MemoryCommandManager;
use crate::dispatcher::MemoryEventDispatcher;
use crate::native::MemoryHost;
use crate::user::MemoryUserManager;

/// Platform identifier reported by [`MemoryPlatform`].
pub const PLATFORM_ID: &str = "memory";

/// Binds a Chameleon core to a [`MemoryHost`].
#[derive(Debug, Clone)]
pub struct MemoryPlatform {
    host: MemoryHost,
    data_folder: Option<PathBuf>,
}

impl MemoryPlatform {
    pub fn new(host: MemoryHost) -> Self {
        Self {
            host,
            data_folder: None,
        }
    }

    /// Sets the folder searched for `chameleon.toml`.
    pub fn with_data_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.data_folder = Some(folder.into());
        self
    }

    pub fn host(&self) -> &MemoryHost {
        &self.host
    }
}

impl Platform for MemoryPlatform {
    fn info(&self) -> PlatformInfo {
        PlatformInfo::new(
            PLATFORM_ID,
            self.host.name(),
            self.host.version(),
            self.host.kind(),
        )
    }

    fn data_folder(&self) -> Option<PathBuf> {
        self.data_folder.clone()
    }

    fn create_components(
        &self,
        bridge: EventBridge,
        config: &FrameworkConfig,
    ) -> PlatformResult<PlatformComponents> {
        let users = Arc::new(MemoryUserManager::new(
            self.host.clone(),
            config.console_name.clone(),
        ));
        let dispatcher =
            MemoryEventDispatcher::new(self.host.clone(), bridge, Arc::clone(&users));
        let commands = MemoryCommandManager::new(self.host.clone(), Arc::clone(&users));

        Ok(PlatformComponents {
            dispatcher: Box::new(dispatcher),
            users,
            commands: Arc::new(commands),
        })
    }
}
