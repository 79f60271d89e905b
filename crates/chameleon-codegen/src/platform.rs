//! Supported host platforms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::descriptor::DescriptorFormat;

/// A host runtime the generator can target.
///
/// [`Memory`](Self::Memory) is the in-process host from
/// `chameleon-platform-memory`. It is only generated for when listed
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    Bukkit,
    BungeeCord,
    Nukkit,
    Velocity,
    Sponge,
    Minestom,
    Memory,
}

impl HostPlatform {
    /// Game hosts, the default targets.
    pub const ALL: [HostPlatform; 6] = [
        Self::Bukkit,
        Self::BungeeCord,
        Self::Nukkit,
        Self::Velocity,
        Self::Sponge,
        Self::Minestom,
    ];

    /// Every platform, including the in-process host.
    pub const KNOWN: [HostPlatform; 7] = [
        Self::Bukkit,
        Self::BungeeCord,
        Self::Nukkit,
        Self::Velocity,
        Self::Sponge,
        Self::Minestom,
        Self::Memory,
    ];

    /// Lowercase identifier, also the generated module name.
    pub fn id(self) -> &'static str {
        match self {
            Self::Bukkit => "bukkit",
            Self::BungeeCord => "bungeecord",
            Self::Nukkit => "nukkit",
            Self::Velocity => "velocity",
            Self::Sponge => "sponge",
            Self::Minestom => "minestom",
            Self::Memory => "memory",
        }
    }

    /// Suffix appended to the plugin type name for the entry point type.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Bukkit => "Bukkit",
            Self::BungeeCord => "BungeeCord",
            Self::Nukkit => "Nukkit",
            Self::Velocity => "Velocity",
            Self::Sponge => "Sponge",
            Self::Minestom => "Minestom",
            Self::Memory => "Memory",
        }
    }

    /// Descriptor path relative to the resource root.
    pub fn descriptor_file(self) -> &'static str {
        match self {
            Self::Bukkit => "plugin.yml",
            Self::BungeeCord => "bungee.yml",
            Self::Nukkit => "nukkit.yml",
            Self::Velocity => "velocity-plugin.json",
            Self::Sponge => "META-INF/sponge_plugins.json",
            Self::Minestom => "extension.json",
            Self::Memory => "chameleon-plugin.json",
        }
    }

    pub fn descriptor_format(self) -> DescriptorFormat {
        match self {
            Self::Bukkit | Self::BungeeCord | Self::Nukkit => DescriptorFormat::Yaml,
            Self::Velocity | Self::Sponge | Self::Minestom | Self::Memory => {
                DescriptorFormat::Json
            }
        }
    }

    /// Crate providing the host adapter the generated entry point binds to.
    pub fn adapter_crate(self) -> String {
        format!("chameleon_platform_{}", self.id())
    }

    /// Host adapter type implementing `chameleon_runtime::Platform`.
    pub fn adapter_type(self) -> String {
        format!("{}Platform", self.suffix())
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for HostPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::KNOWN
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown platform '{s}'"))
    }
}
