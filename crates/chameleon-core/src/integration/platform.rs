//! Platform identity reported by host adapters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a host runs game logic itself or forwards players to backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// A game server. Users are [`ServerUser`](crate::ServerUser)s.
    Server,
    /// A proxy. Users are [`ProxyUser`](crate::ProxyUser)s.
    Proxy,
}

impl PlatformKind {
    pub fn is_proxy(self) -> bool {
        matches!(self, Self::Proxy)
    }
}

/// Identity of the host runtime a core instance is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Stable lowercase identifier, e.g. `bukkit`.
    pub id: String,
    /// Display name of the host software.
    pub name: String,
    /// Host software version.
    pub version: String,
    pub kind: PlatformKind,
}

impl PlatformInfo {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        kind: PlatformKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            kind,
        }
    }
}

impl fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
