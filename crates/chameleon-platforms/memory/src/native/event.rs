//! Native events fired by the in-memory host.
//!
//! ```text
//! NativeEvent
//! ├── Join          after the connection is established, no cancel hook
//! ├── Chat          cancellable, message mutable
//! ├── Quit
//! ├── Kick          server hosts only
//! └── ServerSwitch  proxy hosts only
//! ```

use super::player::{NativePlayer, NativeServer};

#[derive(Debug)]
pub struct PlayerJoin {
    pub player: NativePlayer,
}

#[derive(Debug)]
pub struct PlayerChat {
    pub player: NativePlayer,
    pub message: String,
    pub cancelled: bool,
}

#[derive(Debug)]
pub struct PlayerQuit {
    pub player: NativePlayer,
}

#[derive(Debug)]
pub struct PlayerKick {
    pub player: NativePlayer,
    pub reason: String,
}

#[derive(Debug)]
pub struct ServerSwitch {
    pub player: NativePlayer,
    pub from: Option<NativeServer>,
    pub to: NativeServer,
}

/// Discriminant used when registering a native listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeEventKind {
    Join,
    Chat,
    Quit,
    Kick,
    ServerSwitch,
}

impl NativeEventKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Join => "PlayerJoin",
            Self::Chat => "PlayerChat",
            Self::Quit => "PlayerQuit",
            Self::Kick => "PlayerKick",
            Self::ServerSwitch => "ServerSwitch",
        }
    }
}

/// A native event as delivered to listeners.
#[derive(Debug)]
pub enum NativeEvent {
    Join(PlayerJoin),
    Chat(PlayerChat),
    Quit(PlayerQuit),
    Kick(PlayerKick),
    ServerSwitch(ServerSwitch),
}

impl NativeEvent {
    pub fn kind(&self) -> NativeEventKind {
        match self {
            Self::Join(_) => NativeEventKind::Join,
            Self::Chat(_) => NativeEventKind::Chat,
            Self::Quit(_) => NativeEventKind::Quit,
            Self::Kick(_) => NativeEventKind::Kick,
            Self::ServerSwitch(_) => NativeEventKind::ServerSwitch,
        }
    }
}
