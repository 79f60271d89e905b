//! The native side: an in-process host with its own player, event and
//! command model, independent of Chameleon.

pub mod event;
pub mod host;
pub mod player;

pub use event::{
    NativeEvent, NativeEventKind, PlayerChat, PlayerJoin, PlayerKick, PlayerQuit, ServerSwitch,
};
pub use host::{ListenerHandle, MemoryHost, NativeCommand, NativeListener, QUIT_REASON};
pub use player::{NativePlayer, NativeSender, NativeServer};
